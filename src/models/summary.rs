use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::declaration::MonthKey;

// ---------------------------------------------------------------------------
// StateSummary: one jurisdiction across the whole filter set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub state: String,
    pub miles: Decimal,
    pub gallons: Decimal,
    pub mpg: Decimal,
}

// ---------------------------------------------------------------------------
// VehicleMonthSummary: one row of the month-by-state matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCell {
    pub state: String,
    pub miles: Decimal,
    pub gallons: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMonthSummary {
    pub vehicle_plate: String,
    pub month: MonthKey,
    pub miles: Decimal,
    pub gallons: Decimal,
    pub mpg: Decimal,
    pub states: Vec<StateCell>,
}

// ---------------------------------------------------------------------------
// VehicleSummary / GrandTotal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub vehicle_plate: String,
    pub miles: Decimal,
    pub gallons: Decimal,
    pub mpg: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotal {
    pub miles: Decimal,
    pub gallons: Decimal,
    pub mpg: Decimal,
}

// ---------------------------------------------------------------------------
// QuarterlySummary: everything a declaration-detail view renders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlySummary {
    /// Sorted by state code.
    pub state_summary: Vec<StateSummary>,
    /// Sorted by plate, then chronologically.
    pub monthly: Vec<VehicleMonthSummary>,
    /// Sorted by plate.
    pub vehicles: Vec<VehicleSummary>,
    /// Month columns, chronological.
    pub months: Vec<MonthKey>,
    pub grand_total: GrandTotal,
}

impl QuarterlySummary {
    pub fn state(&self, code: &str) -> Option<&StateSummary> {
        self.state_summary
            .iter()
            .find(|s| s.state.eq_ignore_ascii_case(code))
    }

    pub fn vehicle(&self, plate: &str) -> Option<&VehicleSummary> {
        self.vehicles
            .iter()
            .find(|v| v.vehicle_plate.eq_ignore_ascii_case(plate))
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}
