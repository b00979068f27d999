//! Consumption report endpoints.

use serde_json::{json, Value};

use crate::config::routes;
use crate::connection::Connection;
use crate::error::{IftaError, Result};
use crate::models::{ConsumptionRecord, NewConsumptionRecord, ReportStatus};

// ---------------------------------------------------------------------------
// ReportFilter
// ---------------------------------------------------------------------------

/// Server-side filters for [`ReportApi::list`].
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub company_id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub vehicle_plate: Option<String>,
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(c) = &self.company_id {
            query.push(("companyId", c.clone()));
        }
        if let Some(y) = self.year {
            query.push(("reportYear", y.to_string()));
        }
        if let Some(m) = self.month {
            query.push(("reportMonth", m.to_string()));
        }
        if let Some(p) = &self.vehicle_plate {
            query.push(("vehiclePlate", p.clone()));
        }
        if let Some(s) = self.status {
            query.push(("status", s.as_str().to_string()));
        }
        query
    }
}

// ---------------------------------------------------------------------------
// ReportApi
// ---------------------------------------------------------------------------

pub struct ReportApi<'a> {
    conn: &'a Connection,
}

impl<'a> ReportApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List reports matching `filter`.
    pub fn list(&self, filter: &ReportFilter) -> Result<Vec<ConsumptionRecord>> {
        self.conn.get_query(routes::REPORTS, &filter.to_query())
    }

    pub fn list_by_company(&self, company_id: &str) -> Result<Vec<ConsumptionRecord>> {
        self.conn.get(&routes::company_reports(company_id))
    }

    pub fn list_trashed(&self) -> Result<Vec<ConsumptionRecord>> {
        self.conn.get(routes::TRASHED_REPORTS)
    }

    /// Fetch one report. A 404 is `Ok(None)`.
    pub fn get(&self, id: &str) -> Result<Option<ConsumptionRecord>> {
        match self.conn.get(&routes::report(id)) {
            Ok(record) => Ok(Some(record)),
            Err(IftaError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Validate and submit a new report.
    pub fn create(&self, report: &NewConsumptionRecord) -> Result<ConsumptionRecord> {
        report.validate()?;
        self.conn.post(routes::REPORTS, report)
    }

    /// Replace a report's contents (the edit-and-resubmit flow).
    pub fn update(&self, id: &str, report: &NewConsumptionRecord) -> Result<ConsumptionRecord> {
        report.validate()?;
        self.conn.put(&routes::report(id), report)
    }

    pub fn set_status(&self, id: &str, status: ReportStatus) -> Result<ConsumptionRecord> {
        self.conn
            .patch(&routes::report(id), &json!({ "status": status }))
    }

    /// Move a report to the trash. Reports are never hard-deleted.
    pub fn trash(&self, id: &str) -> Result<()> {
        let _: Value = self
            .conn
            .patch(&routes::report_action(id, "trash"), &json!({}))?;
        Ok(())
    }

    pub fn restore(&self, id: &str) -> Result<()> {
        let _: Value = self
            .conn
            .patch(&routes::report_action(id, "restore"), &json!({}))?;
        Ok(())
    }
}
