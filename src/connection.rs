//! HTTP connection to the reporting API.
//!
//! Owns the HTTP client, the API base URL and the current [`Session`]. Every
//! response is checked once here: error statuses become
//! [`IftaError::Api`] with the server's payload untouched, and success bodies
//! are unwrapped from the optional `{"data": ...}` envelope and decoded into
//! the caller's type. No retries and no caching.

use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{IftaError, Result};
use crate::session::Session;

/// Wraps the blocking HTTP client together with the session whose bearer
/// token authenticates each request.
pub struct Connection {
    base_url: String,
    timeout: Duration,
    client: RefCell<Option<Client>>,
    session: RefCell<Session>,
}

impl Connection {
    /// Create a connection against `base_url` (trailing slashes ignored).
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: RefCell::new(None),
            session: RefCell::new(session),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A copy of the current session.
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn set_session(&self, session: Session) {
        *self.session.borrow_mut() = session;
    }

    /// Take the current session out, leaving an anonymous one in its place.
    pub fn take_session(&self) -> Session {
        self.session.replace(Session::Anonymous)
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<Client> {
        if let Some(client) = self.client.borrow().as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        *self.client.borrow_mut() = Some(client.clone());
        Ok(client)
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // -- Verbs -------------------------------------------------------------

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, path, &[], None)
    }

    pub fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.request::<(), T>(Method::GET, path, query, None)
    }

    pub fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, &[], Some(body))
    }

    pub fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, &[], Some(body))
    }

    pub fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, &[], Some(body))
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::DELETE, path, &[], None)
    }

    /// Send one request and decode its response.
    ///
    /// Attaches `Authorization: Bearer <token>` while the session is valid.
    pub fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("{} {}", method, url);

        let mut req = self.client()?.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = self.session.borrow().token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        if !(200..300).contains(&status) {
            log::warn!("{} {} failed with status {}", method, url, status);
        }
        decode_response(status, &text)
    }
}

/// Turn a raw status and body into a typed result.
///
/// Non-2xx statuses yield [`IftaError::Api`] carrying the body as JSON when
/// it parses, or as a JSON string otherwise. An empty 2xx body decodes as
/// JSON `null` (so `()` and `Option<T>` targets work).
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    if !(200..300).contains(&status) {
        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
        };
        return Err(IftaError::Api { status, payload });
    }

    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body)?
    };
    unwrap_envelope(value)
}

/// Accept either `{"data": T}` or a bare `T`.
pub fn unwrap_envelope<T: DeserializeOwned>(value: Value) -> Result<T> {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            Ok(serde_json::from_value(data)?)
        }
        other => Ok(serde_json::from_value(other)?),
    }
}
