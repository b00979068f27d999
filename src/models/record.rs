use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::declaration::{MonthKey, Quarter};
use super::lenient;
use crate::error::{IftaError, Result};

// ---------------------------------------------------------------------------
// ReportStatus
// ---------------------------------------------------------------------------

/// Workflow status of a consumption record, ordered by progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    InProgress,
    Completed,
    Sent,
}

impl ReportStatus {
    /// Parse a wire status. Accepts `in_progress`, `in-progress`,
    /// `inprogress` and any casing.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "inprogress" => Some(ReportStatus::InProgress),
            "completed" => Some(ReportStatus::Completed),
            "sent" => Some(ReportStatus::Sent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Completed => "completed",
            ReportStatus::Sent => "sent",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown statuses read as `in_progress`.
impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(ReportStatus::parse)
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// StateEntry: one jurisdiction's contribution to a vehicle-month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub state_code: String,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub miles: Decimal,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub gallons: Decimal,
}

impl StateEntry {
    pub fn new(state_code: &str, miles: Decimal, gallons: Decimal) -> Self {
        Self {
            state_code: state_code.to_string(),
            miles,
            gallons,
        }
    }
}

// ---------------------------------------------------------------------------
// ConsumptionRecord: one vehicle, one reporting month
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRecord {
    #[serde(
        default,
        alias = "_id",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub vehicle_plate: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub report_year: i32,
    #[serde(default, deserialize_with = "lenient::month")]
    pub report_month: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company_id: String,
    #[serde(default, deserialize_with = "lenient::list")]
    pub states: Vec<StateEntry>,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub trashed: bool,
    #[serde(
        default,
        deserialize_with = "lenient::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConsumptionRecord {
    pub fn new(
        vehicle_plate: &str,
        report_year: i32,
        report_month: u32,
        company_id: &str,
        states: Vec<StateEntry>,
    ) -> Self {
        Self {
            id: None,
            vehicle_plate: vehicle_plate.to_string(),
            report_year,
            report_month,
            company_id: company_id.to_string(),
            states,
            status: ReportStatus::InProgress,
            trashed: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// `None` when the month is outside 1..=12.
    pub fn quarter(&self) -> Option<Quarter> {
        Quarter::from_month(self.report_month)
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::new(self.report_year, self.report_month)
    }

    pub fn total_miles(&self) -> Decimal {
        self.states.iter().map(|s| s.miles).sum()
    }

    pub fn total_gallons(&self) -> Decimal {
        self.states.iter().map(|s| s.gallons).sum()
    }
}

// ---------------------------------------------------------------------------
// NewConsumptionRecord: create / edit-and-resubmit payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsumptionRecord {
    pub vehicle_plate: String,
    pub report_year: i32,
    pub report_month: u32,
    pub company_id: String,
    pub states: Vec<StateEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReportStatus>,
}

impl NewConsumptionRecord {
    /// Check the payload before it is sent. Aggregation tolerates bad data;
    /// the write path does not.
    pub fn validate(&self) -> Result<()> {
        if self.vehicle_plate.trim().is_empty() {
            return Err(IftaError::InvalidArgument(
                "vehicle plate is required".into(),
            ));
        }
        if self.company_id.trim().is_empty() {
            return Err(IftaError::InvalidArgument("company id is required".into()));
        }
        if !(1..=12).contains(&self.report_month) {
            return Err(IftaError::InvalidArgument(format!(
                "report month must be 1-12, got {}",
                self.report_month
            )));
        }
        if !(2000..=2100).contains(&self.report_year) {
            return Err(IftaError::InvalidArgument(format!(
                "report year out of range: {}",
                self.report_year
            )));
        }
        if self.states.is_empty() {
            return Err(IftaError::InvalidArgument(
                "at least one state entry is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.states {
            let code = entry.state_code.trim().to_ascii_uppercase();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(IftaError::InvalidArgument(format!(
                    "invalid state code '{}'",
                    entry.state_code
                )));
            }
            if entry.miles.is_sign_negative() || entry.gallons.is_sign_negative() {
                return Err(IftaError::InvalidArgument(format!(
                    "miles and gallons must be non-negative for {}",
                    code
                )));
            }
            if !seen.insert(code.clone()) {
                return Err(IftaError::InvalidArgument(format!(
                    "state {} appears more than once",
                    code
                )));
            }
        }
        Ok(())
    }
}

impl From<&ConsumptionRecord> for NewConsumptionRecord {
    fn from(record: &ConsumptionRecord) -> Self {
        Self {
            vehicle_plate: record.vehicle_plate.clone(),
            report_year: record.report_year,
            report_month: record.report_month,
            company_id: record.company_id.clone(),
            states: record.states.clone(),
            status: Some(record.status),
        }
    }
}
