//! Wire-shape and validation tests for the record models.

mod common;

use common::{d, record, sample_records_json};
use ifta_sdk::models::{LoginResponse, MonthKey};
use ifta_sdk::{
    Company, ConsumptionRecord, IftaError, NewCompany, NewConsumptionRecord, ReportStatus, Role,
    StateEntry, User,
};

// ---------------------------------------------------------------------------
// ConsumptionRecord parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_server_records_with_loose_shapes() {
    let records: Vec<ConsumptionRecord> = serde_json::from_value(sample_records_json()).unwrap();
    assert_eq!(records.len(), 3);

    let r1 = &records[0];
    assert_eq!(r1.id.as_deref(), Some("r1"));
    assert_eq!(r1.status, ReportStatus::Completed);
    assert_eq!(r1.states[1].miles, d("40"));

    let r2 = &records[1];
    assert_eq!(r2.company_id, "company-1");
    assert_eq!(r2.report_year, 2024);
    assert_eq!(r2.report_month, 2);
    assert_eq!(r2.month_key(), MonthKey::new(2024, 2));
    assert_eq!(r2.states[0].miles, d("50.5"));

    assert!(records[2].trashed);
    assert!(!r1.trashed);
}

#[test]
fn unknown_status_reads_as_in_progress() {
    let r: ConsumptionRecord = serde_json::from_value(serde_json::json!({
        "vehiclePlate": "T1", "reportYear": 2024, "reportMonth": 1, "status": "archived"
    }))
    .unwrap();
    assert_eq!(r.status, ReportStatus::InProgress);
}

#[test]
fn timestamps_parse_or_drop() {
    let r: ConsumptionRecord = serde_json::from_value(serde_json::json!({
        "vehiclePlate": "T1",
        "createdAt": "2024-02-01T10:00:00Z",
        "updatedAt": "yesterday"
    }))
    .unwrap();
    assert!(r.created_at.is_some());
    assert!(r.updated_at.is_none());
}

#[test]
fn record_totals() {
    let r = record("T1", 2024, 1, &[("TX", "100", "10"), ("CA", "50.25", "4.75")]);
    assert_eq!(r.total_miles(), d("150.25"));
    assert_eq!(r.total_gallons(), d("14.75"));
}

// ---------------------------------------------------------------------------
// NewConsumptionRecord validation
// ---------------------------------------------------------------------------

fn valid_new_record() -> NewConsumptionRecord {
    NewConsumptionRecord {
        vehicle_plate: "T1".into(),
        report_year: 2024,
        report_month: 3,
        company_id: "company-1".into(),
        states: vec![
            StateEntry::new("TX", d("100"), d("10")),
            StateEntry::new("ca", d("20"), d("0")),
        ],
        status: None,
    }
}

fn assert_invalid(r: &NewConsumptionRecord) {
    assert!(matches!(r.validate(), Err(IftaError::InvalidArgument(_))));
}

#[test]
fn valid_record_passes() {
    assert!(valid_new_record().validate().is_ok());
}

#[test]
fn invalid_records_are_rejected() {
    let mut r = valid_new_record();
    r.vehicle_plate = "  ".into();
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.report_month = 13;
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.report_month = 0;
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.report_year = 1999;
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.states.clear();
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.states.push(StateEntry::new("TEX", d("1"), d("1")));
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.states.push(StateEntry::new("T1", d("1"), d("1")));
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.states.push(StateEntry::new("tx", d("1"), d("1")));
    assert_invalid(&r);

    let mut r = valid_new_record();
    r.states[0].gallons = d("-1");
    assert_invalid(&r);
}

#[test]
fn new_record_serializes_camel_case() {
    let json = serde_json::to_value(valid_new_record()).unwrap();
    assert_eq!(json["vehiclePlate"], "T1");
    assert_eq!(json["reportMonth"], 3);
    assert_eq!(json["states"][0]["stateCode"], "TX");
    assert_eq!(json["states"][0]["miles"].as_f64(), Some(100.0));
    assert!(json.get("status").is_none());
}

#[test]
fn edit_flow_copies_existing_record() {
    let mut existing = record("T1", 2024, 1, &[("TX", "1", "1")]);
    existing.status = ReportStatus::Completed;
    let edit = NewConsumptionRecord::from(&existing);
    assert_eq!(edit.vehicle_plate, "T1");
    assert_eq!(edit.status, Some(ReportStatus::Completed));
    assert!(edit.validate().is_ok());
}

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

#[test]
fn company_parses_with_mongo_id() {
    let c: Company = serde_json::from_value(serde_json::json!({
        "_id": "c1",
        "name": "Acme Freight",
        "iftaAccountNumber": "TX-123",
        "dotNumber": 1234567,
        "email": ""
    }))
    .unwrap();
    assert_eq!(c.id, "c1");
    assert_eq!(c.dot_number.as_deref(), Some("1234567"));
    assert_eq!(c.email, None);
    assert!(!c.trashed);
}

#[test]
fn company_validation() {
    let ok = NewCompany {
        name: "Acme".into(),
        email: Some("ops@acme.com".into()),
        dot_number: Some("1234567".into()),
        ..Default::default()
    };
    assert!(ok.validate().is_ok());

    let no_name = NewCompany::default();
    assert!(no_name.validate().is_err());

    let bad_email = NewCompany {
        name: "Acme".into(),
        email: Some("not-an-email".into()),
        ..Default::default()
    };
    assert!(bad_email.validate().is_err());

    let bad_dot = NewCompany {
        name: "Acme".into(),
        dot_number: Some("12A".into()),
        ..Default::default()
    };
    assert!(bad_dot.validate().is_err());
}

// ---------------------------------------------------------------------------
// Users and roles
// ---------------------------------------------------------------------------

#[test]
fn role_strings_map_to_closed_enum() {
    assert_eq!(Role::from_role_str("admin"), Role::Admin);
    assert_eq!(Role::from_role_str(" ADMIN "), Role::Admin);
    assert_eq!(Role::from_role_str("client"), Role::Client);
    assert_eq!(Role::from_role_str("dispatcher"), Role::Client);
    assert_eq!(Role::from_role_str(""), Role::Client);
}

#[test]
fn login_response_accepts_access_token_alias() {
    let resp: LoginResponse = serde_json::from_value(serde_json::json!({
        "accessToken": "abc",
        "user": { "id": "u1", "email": "a@b.co", "role": "Admin", "company": { "_id": "c9" } }
    }))
    .unwrap();
    assert_eq!(resp.token, "abc");
    assert_eq!(resp.user.role(), Role::Admin);
    assert_eq!(resp.user.company_id.as_deref(), Some("c9"));
}

#[test]
fn user_without_role_is_client() {
    let u: User = serde_json::from_value(serde_json::json!({ "_id": "u2", "email": "x@y.co" })).unwrap();
    assert_eq!(u.role(), Role::Client);
}
