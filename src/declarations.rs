//! Quarterly declarations derived from consumption records.
//!
//! A declaration is not stored on its own: it is the set of records sharing a
//! `(company, quarter, year)` key, and its status is the least-advanced status
//! among them.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::plate_key;

use crate::models::{
    ConsumptionRecord, DeclarationKey, Quarter, QuarterlyDeclaration, ReportStatus,
};

/// The declaration a record belongs to, if its month is valid.
pub fn declaration_key(record: &ConsumptionRecord) -> Option<DeclarationKey> {
    let quarter = record.quarter()?;
    Some(DeclarationKey::new(
        record.company_id.trim(),
        quarter,
        record.report_year,
    ))
}

/// Status of a declaration given its records' statuses. An empty set is
/// still in progress.
pub fn derive_status<I>(statuses: I) -> ReportStatus
where
    I: IntoIterator<Item = ReportStatus>,
{
    statuses.into_iter().min().unwrap_or_default()
}

/// Group non-trashed records into declarations, ordered by company, year,
/// then quarter. Records whose month is outside 1..=12 are skipped.
pub fn group_declarations(records: &[ConsumptionRecord]) -> Vec<QuarterlyDeclaration> {
    struct Group {
        status: ReportStatus,
        records: usize,
        plates: BTreeSet<String>,
    }

    let mut groups: BTreeMap<DeclarationKey, Group> = BTreeMap::new();

    for record in records.iter().filter(|r| !r.trashed) {
        let Some(key) = declaration_key(record) else {
            log::debug!(
                "skipping record {:?} with invalid month {}",
                record.id,
                record.report_month
            );
            continue;
        };
        let group = groups.entry(key).or_insert_with(|| Group {
            status: record.status,
            records: 0,
            plates: BTreeSet::new(),
        });
        group.status = group.status.min(record.status);
        group.records += 1;
        group.plates.insert(plate_key(&record.vehicle_plate));
    }

    groups
        .into_iter()
        .map(|(key, g)| QuarterlyDeclaration {
            key,
            status: g.status,
            record_count: g.records,
            vehicle_count: g.plates.len(),
        })
        .collect()
}

/// Non-trashed records belonging to one declaration.
pub fn records_in<'a>(
    records: &'a [ConsumptionRecord],
    key: &DeclarationKey,
) -> Vec<&'a ConsumptionRecord> {
    records
        .iter()
        .filter(|r| !r.trashed)
        .filter(|r| declaration_key(r).as_ref() == Some(key))
        .collect()
}

/// The quarter containing `date`'s month.
pub fn quarter_of(date: chrono::NaiveDate) -> Quarter {
    use chrono::Datelike;
    Quarter::from_month(date.month()).unwrap_or(Quarter::Q1)
}
