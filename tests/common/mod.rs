//! Shared test fixtures for the IFTA SDK integration tests.
//!
//! Provides record builders, a JWT builder, and `serve()` which starts a
//! loopback HTTP server answering with canned responses and recording every
//! request it receives.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::thread;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ifta_sdk::{ConsumptionRecord, IftaSdk, StateEntry};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// One vehicle-month record for `company-1`.
pub fn record(plate: &str, year: i32, month: u32, states: &[(&str, &str, &str)]) -> ConsumptionRecord {
    record_for("company-1", plate, year, month, states)
}

pub fn record_for(
    company: &str,
    plate: &str,
    year: i32,
    month: u32,
    states: &[(&str, &str, &str)],
) -> ConsumptionRecord {
    let entries = states
        .iter()
        .map(|(code, miles, gallons)| StateEntry::new(code, d(miles), d(gallons)))
        .collect();
    ConsumptionRecord::new(plate, year, month, company, entries)
}

/// Two trucks over Q1 2024 in three states.
pub fn sample_records() -> Vec<ConsumptionRecord> {
    vec![
        record("T1", 2024, 1, &[("TX", "100", "10"), ("NM", "40", "5")]),
        record("T1", 2024, 2, &[("TX", "50", "5")]),
        record("T2", 2024, 1, &[("CA", "200", "25")]),
        record("T2", 2024, 3, &[("CA", "120", "15"), ("TX", "30", "0")]),
    ]
}

pub fn sample_records_json() -> serde_json::Value {
    serde_json::json!([
        {
            "_id": "r1",
            "vehiclePlate": "T1",
            "reportYear": 2024,
            "reportMonth": 1,
            "companyId": "company-1",
            "status": "completed",
            "states": [
                { "stateCode": "TX", "miles": 100, "gallons": 10 },
                { "stateCode": "NM", "miles": "40", "gallons": "5" }
            ]
        },
        {
            "_id": "r2",
            "vehiclePlate": "T1",
            "reportYear": "2024",
            "reportMonth": "2",
            "companyId": { "_id": "company-1", "name": "Acme Freight" },
            "status": "in_progress",
            "states": [
                { "stateCode": "TX", "miles": 50.5, "gallons": 5 }
            ]
        },
        {
            "_id": "r3",
            "vehiclePlate": "T2",
            "reportYear": 2024,
            "reportMonth": 3,
            "companyId": "company-1",
            "status": "completed",
            "trashed": true,
            "states": [
                { "stateCode": "CA", "miles": 999, "gallons": 1 }
            ]
        }
    ])
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Unsigned JWT with the given `exp` claim.
pub fn jwt_with_exp(exp: i64) -> String {
    jwt_with_claims(serde_json::json!({ "sub": "user-1", "exp": exp }))
}

/// Unsigned JWT carrying arbitrary claims.
pub fn jwt_with_claims(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{}.{}.signature", header, payload)
}

pub fn login_body(token: &str, role: &str) -> String {
    serde_json::json!({
        "data": {
            "token": token,
            "user": {
                "_id": "user-1",
                "email": "ops@example.com",
                "name": "Ops",
                "role": role,
                "companyId": "company-1"
            }
        }
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Loopback HTTP stub
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// An SDK pointed at this server with session persistence off.
    pub fn sdk(&self) -> IftaSdk {
        IftaSdk::builder()
            .base_url(&self.base_url)
            .persist_session(false)
            .build()
            .unwrap()
    }
}

/// Answer one request per canned `(status, body)` pair, in order.
pub fn serve(responses: Vec<(u16, String)>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let target = parts.next().unwrap_or_default().to_string();

            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    let (k, v) = (k.trim().to_string(), v.trim().to_string());
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.parse().unwrap_or(0);
                    }
                    headers.push((k, v));
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();

            recorded.lock().unwrap().push(RecordedRequest {
                method,
                target,
                headers,
                body: String::from_utf8_lossy(&buf).into_owned(),
            });

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });

    StubServer {
        base_url: format!("http://{}/api", addr),
        requests,
    }
}
