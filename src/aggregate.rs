//! Quarterly aggregation of consumption records.
//!
//! Reduces a flat list of per-vehicle, per-month records into the summaries a
//! declaration needs: totals by state, by vehicle, by vehicle-month (with the
//! per-state cells of the month-by-state matrix) and a grand total.
//!
//! Every grouping is keyed in a `BTreeMap`, so output order depends only on
//! the keys and never on input order. MPG is always derived from the summed
//! miles and gallons of a group.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::models::{
    ConsumptionRecord, GrandTotal, MonthKey, QuarterlySummary, StateCell, StateEntry,
    StateSummary, VehicleMonthSummary, VehicleSummary,
};

/// Miles per gallon, or zero when no fuel was recorded.
pub fn mpg(miles: Decimal, gallons: Decimal) -> Decimal {
    if gallons > Decimal::ZERO {
        miles.checked_div(gallons).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    miles: Decimal,
    gallons: Decimal,
}

impl Totals {
    fn add(&mut self, entry: &StateEntry) {
        self.miles = self.miles.saturating_add(entry.miles);
        self.gallons = self.gallons.saturating_add(entry.gallons);
    }

    fn mpg(&self) -> Decimal {
        mpg(self.miles, self.gallons)
    }
}

fn state_key(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub(crate) fn plate_key(plate: &str) -> String {
    plate.trim().to_ascii_uppercase()
}

/// Aggregate an already-filtered set of records.
///
/// Never fails: malformed numeric input was coerced to zero when the records
/// were parsed. Records without state entries still produce a (zero) vehicle
/// row, vehicle-month row and month column.
pub fn aggregate<'a, I>(records: I) -> QuarterlySummary
where
    I: IntoIterator<Item = &'a ConsumptionRecord>,
{
    let mut by_state: BTreeMap<String, Totals> = BTreeMap::new();
    let mut by_vehicle: BTreeMap<String, Totals> = BTreeMap::new();
    let mut by_vehicle_month: BTreeMap<(String, MonthKey), Totals> = BTreeMap::new();
    let mut by_cell: BTreeMap<(String, MonthKey, String), Totals> = BTreeMap::new();
    let mut months: BTreeSet<MonthKey> = BTreeSet::new();
    let mut grand = Totals::default();

    for record in records {
        let plate = plate_key(&record.vehicle_plate);
        let month = record.month_key();
        months.insert(month);

        let vehicle = by_vehicle.entry(plate.clone()).or_default();
        let vehicle_month = by_vehicle_month
            .entry((plate.clone(), month))
            .or_default();

        for entry in &record.states {
            let state = state_key(&entry.state_code);
            by_state.entry(state.clone()).or_default().add(entry);
            by_cell
                .entry((plate.clone(), month, state))
                .or_default()
                .add(entry);
            vehicle.add(entry);
            vehicle_month.add(entry);
            grand.add(entry);
        }
    }

    let state_summary = by_state
        .into_iter()
        .map(|(state, t)| StateSummary {
            state,
            miles: t.miles,
            gallons: t.gallons,
            mpg: t.mpg(),
        })
        .collect();

    let vehicles = by_vehicle
        .into_iter()
        .map(|(vehicle_plate, t)| VehicleSummary {
            vehicle_plate,
            miles: t.miles,
            gallons: t.gallons,
            mpg: t.mpg(),
        })
        .collect();

    let mut monthly: BTreeMap<(String, MonthKey), VehicleMonthSummary> = by_vehicle_month
        .into_iter()
        .map(|((plate, month), t)| {
            let row = VehicleMonthSummary {
                vehicle_plate: plate.clone(),
                month,
                miles: t.miles,
                gallons: t.gallons,
                mpg: t.mpg(),
                states: Vec::new(),
            };
            ((plate, month), row)
        })
        .collect();

    // by_cell iterates in (plate, month, state) order, so each row's cells
    // come out sorted by state.
    for ((plate, month, state), t) in by_cell {
        if let Some(row) = monthly.get_mut(&(plate, month)) {
            row.states.push(StateCell {
                state,
                miles: t.miles,
                gallons: t.gallons,
            });
        }
    }

    QuarterlySummary {
        state_summary,
        monthly: monthly.into_values().collect(),
        vehicles,
        months: months.into_iter().collect(),
        grand_total: GrandTotal {
            miles: grand.miles,
            gallons: grand.gallons,
            mpg: grand.mpg(),
        },
    }
}

/// Aggregate only records that have not been trashed.
pub fn summarize_active(records: &[ConsumptionRecord]) -> QuarterlySummary {
    aggregate(records.iter().filter(|r| !r.trashed))
}
