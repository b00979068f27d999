//! Quarter arithmetic and derived declaration tests.

mod common;

use chrono::NaiveDate;
use common::{record, record_for};
use ifta_sdk::declarations::{
    declaration_key, derive_status, group_declarations, quarter_of, records_in,
};
use ifta_sdk::models::DeclarationKey;
use ifta_sdk::{Quarter, ReportStatus};

// ---------------------------------------------------------------------------
// Quarter
// ---------------------------------------------------------------------------

#[test]
fn quarter_from_month_covers_calendar() {
    assert_eq!(Quarter::from_month(1), Some(Quarter::Q1));
    assert_eq!(Quarter::from_month(3), Some(Quarter::Q1));
    assert_eq!(Quarter::from_month(4), Some(Quarter::Q2));
    assert_eq!(Quarter::from_month(9), Some(Quarter::Q3));
    assert_eq!(Quarter::from_month(12), Some(Quarter::Q4));
    assert_eq!(Quarter::from_month(0), None);
    assert_eq!(Quarter::from_month(13), None);
}

#[test]
fn quarter_months_and_display() {
    assert_eq!(Quarter::Q1.months(), [1, 2, 3]);
    assert_eq!(Quarter::Q4.months(), [10, 11, 12]);
    assert!(Quarter::Q3.contains_month(8));
    assert!(!Quarter::Q3.contains_month(10));
    assert_eq!(Quarter::Q2.to_string(), "Q2");

    for q in Quarter::ALL {
        for m in q.months() {
            assert_eq!(Quarter::from_month(m), Some(q));
        }
    }
}

#[test]
fn quarter_serializes_as_number() {
    assert_eq!(serde_json::to_value(Quarter::Q3).unwrap(), serde_json::json!(3));
    let q: Quarter = serde_json::from_value(serde_json::json!(4)).unwrap();
    assert_eq!(q, Quarter::Q4);
    assert!(serde_json::from_value::<Quarter>(serde_json::json!(5)).is_err());
}

#[test]
fn quarter_of_date() {
    assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()), Quarter::Q1);
    assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()), Quarter::Q3);
    assert_eq!(quarter_of(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), Quarter::Q4);
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[test]
fn status_parse_accepts_variants() {
    assert_eq!(ReportStatus::parse("in_progress"), Some(ReportStatus::InProgress));
    assert_eq!(ReportStatus::parse("In-Progress"), Some(ReportStatus::InProgress));
    assert_eq!(ReportStatus::parse("COMPLETED"), Some(ReportStatus::Completed));
    assert_eq!(ReportStatus::parse(" sent "), Some(ReportStatus::Sent));
    assert_eq!(ReportStatus::parse("archived"), None);
}

#[test]
fn derived_status_is_least_advanced() {
    use ReportStatus::*;
    assert_eq!(derive_status([Sent, Sent]), Sent);
    assert_eq!(derive_status([Sent, Completed, Sent]), Completed);
    assert_eq!(derive_status([Completed, InProgress]), InProgress);
    assert_eq!(derive_status(Vec::new()), InProgress);
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn records_group_by_company_quarter_year() {
    let mut records = vec![
        record_for("acme", "T1", 2024, 1, &[("TX", "10", "1")]),
        record_for("acme", "T2", 2024, 2, &[("TX", "10", "1")]),
        record_for("acme", "T1", 2024, 3, &[("TX", "10", "1")]),
        record_for("acme", "T1", 2024, 4, &[("TX", "10", "1")]),
        record_for("acme", "T1", 2023, 11, &[("TX", "10", "1")]),
        record_for("beta", "B1", 2024, 1, &[("CA", "10", "1")]),
    ];
    records[0].status = ReportStatus::Sent;
    records[1].status = ReportStatus::Completed;
    records[2].status = ReportStatus::Sent;

    let decls = group_declarations(&records);
    let keys: Vec<(String, i32, Quarter)> = decls
        .iter()
        .map(|d| (d.key.company_id.clone(), d.key.year, d.key.quarter))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("acme".to_string(), 2023, Quarter::Q4),
            ("acme".to_string(), 2024, Quarter::Q1),
            ("acme".to_string(), 2024, Quarter::Q2),
            ("beta".to_string(), 2024, Quarter::Q1),
        ]
    );

    let q1 = &decls[1];
    assert_eq!(q1.record_count, 3);
    assert_eq!(q1.vehicle_count, 2);
    assert_eq!(q1.status, ReportStatus::Completed);
}

#[test]
fn trashed_and_invalid_month_records_are_left_out() {
    let mut records = vec![
        record("T1", 2024, 1, &[("TX", "10", "1")]),
        record("T1", 2024, 2, &[("TX", "10", "1")]),
        record("T1", 2024, 13, &[("TX", "10", "1")]),
    ];
    records[1].trashed = true;
    records[1].status = ReportStatus::InProgress;
    records[0].status = ReportStatus::Sent;

    let decls = group_declarations(&records);
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].record_count, 1);
    assert_eq!(decls[0].status, ReportStatus::Sent);
    assert!(declaration_key(&records[2]).is_none());
}

#[test]
fn records_in_selects_one_declaration() {
    let records = vec![
        record("T1", 2024, 1, &[("TX", "10", "1")]),
        record("T1", 2024, 5, &[("TX", "10", "1")]),
        record("T2", 2024, 3, &[("TX", "10", "1")]),
        record("T2", 2023, 3, &[("TX", "10", "1")]),
    ];
    let key = DeclarationKey::new("company-1", Quarter::Q1, 2024);
    let selected = records_in(&records, &key);

    assert_eq!(selected.len(), 2);
    assert!(selected.iter().all(|r| r.report_year == 2024 && r.report_month <= 3));
}

#[test]
fn declaration_serializes_flat() {
    let decls = group_declarations(&[record("T1", 2024, 7, &[("TX", "1", "1")])]);
    let json = serde_json::to_value(&decls[0]).unwrap();

    assert_eq!(json["companyId"], "company-1");
    assert_eq!(json["quarter"], 3);
    assert_eq!(json["year"], 2024);
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["recordCount"], 1);
}

#[test]
fn vehicle_count_matches_aggregate_plate_keys() {
    let records = vec![
        record("t1", 2024, 1, &[("TX", "10", "1")]),
        record(" T1 ", 2024, 2, &[("TX", "10", "1")]),
        record("T2", 2024, 3, &[("TX", "10", "1")]),
    ];
    let decls = group_declarations(&records);
    let summary = ifta_sdk::aggregate(&records);

    assert_eq!(decls[0].vehicle_count, 2);
    assert_eq!(decls[0].vehicle_count, summary.vehicles.len());
}

#[test]
fn declaration_key_trims_company_id() {
    let key = DeclarationKey::new("  company-1 ", Quarter::Q1, 2024);
    assert_eq!(key.company_id, "company-1");
    let records = vec![record("T1", 2024, 2, &[("TX", "10", "1")])];
    assert_eq!(records_in(&records, &key).len(), 1);
}
