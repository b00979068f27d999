use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::ReportStatus;

// ---------------------------------------------------------------------------
// Quarter: Q1 = Jan-Mar, ..., Q4 = Oct-Dec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quarter {
    Q1 = 1,
    Q2 = 2,
    Q3 = 3,
    Q4 = 4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn from_month(month: u32) -> Option<Self> {
        match month {
            1..=3 => Some(Quarter::Q1),
            4..=6 => Some(Quarter::Q2),
            7..=9 => Some(Quarter::Q3),
            10..=12 => Some(Quarter::Q4),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// The three calendar months in this quarter.
    pub fn months(&self) -> [u32; 3] {
        let first = (self.number() as u32 - 1) * 3 + 1;
        [first, first + 1, first + 2]
    }

    pub fn contains_month(&self, month: u32) -> bool {
        Quarter::from_month(month) == Some(*self)
    }
}

impl TryFrom<u8> for Quarter {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Quarter::Q1),
            2 => Ok(Quarter::Q2),
            3 => Ok(Quarter::Q3),
            4 => Ok(Quarter::Q4),
            other => Err(format!("quarter must be 1-4, got {}", other)),
        }
    }
}

impl From<Quarter> for u8 {
    fn from(q: Quarter) -> Self {
        q.number()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// MonthKey: (year, month), ordered chronologically
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// QuarterlyDeclaration: derived from records, never stored
// ---------------------------------------------------------------------------

/// Field order gives the listing order: company, then year, then quarter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationKey {
    pub company_id: String,
    pub year: i32,
    pub quarter: Quarter,
}

impl DeclarationKey {
    /// The company id is trimmed so caller input and record data key alike.
    pub fn new(company_id: &str, quarter: Quarter, year: i32) -> Self {
        Self {
            company_id: company_id.trim().to_string(),
            year,
            quarter,
        }
    }
}

impl fmt::Display for DeclarationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.company_id, self.quarter, self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyDeclaration {
    #[serde(flatten)]
    pub key: DeclarationKey,
    pub status: ReportStatus,
    pub record_count: usize,
    pub vehicle_count: usize,
}
