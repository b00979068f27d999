//! Quarterly declaration endpoints.
//!
//! The backend serves the records of one company-quarter; summaries and the
//! declaration list are derived from records on this side.

use serde_json::{json, Value};

use crate::aggregate;
use crate::config::routes;
use crate::connection::Connection;
use crate::declarations;
use crate::error::{IftaError, Result};
use crate::models::{
    ConsumptionRecord, DeclarationKey, Quarter, QuarterlyDeclaration, QuarterlySummary,
    ReportStatus,
};

use super::reports::ReportApi;

pub struct DeclarationApi<'a> {
    conn: &'a Connection,
}

impl<'a> DeclarationApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Records of one company-quarter, as served.
    pub fn records(
        &self,
        company_id: &str,
        quarter: Quarter,
        year: i32,
    ) -> Result<Vec<ConsumptionRecord>> {
        self.conn
            .get(&routes::quarterly(company_id.trim(), quarter, year))
    }

    /// Fetch a company-quarter and aggregate its non-trashed records.
    pub fn summary(&self, company_id: &str, quarter: Quarter, year: i32) -> Result<QuarterlySummary> {
        let records = self.records(company_id, quarter, year)?;
        log::debug!(
            "Aggregating {} records for {} {} {}",
            records.len(),
            company_id,
            quarter,
            year
        );
        Ok(aggregate::summarize_active(&records))
    }

    /// The declaration for one company-quarter, or `None` when it has no
    /// records.
    pub fn get(
        &self,
        company_id: &str,
        quarter: Quarter,
        year: i32,
    ) -> Result<Option<QuarterlyDeclaration>> {
        let records = self.records(company_id, quarter, year)?;
        let key = DeclarationKey::new(company_id, quarter, year);
        Ok(declarations::group_declarations(&records)
            .into_iter()
            .find(|d| d.key == key))
    }

    /// All declarations of a company, derived from its reports.
    pub fn list_for_company(&self, company_id: &str) -> Result<Vec<QuarterlyDeclaration>> {
        let records = ReportApi::new(self.conn).list_by_company(company_id)?;
        Ok(declarations::group_declarations(&records))
    }

    /// Change a declaration's status. The backend applies it to every record
    /// of the company-quarter; the refreshed records are returned.
    ///
    /// A company-quarter with no records afterwards is [`IftaError::NotFound`].
    pub fn set_status(
        &self,
        company_id: &str,
        quarter: Quarter,
        year: i32,
        status: ReportStatus,
    ) -> Result<Vec<ConsumptionRecord>> {
        let _: Value = self.conn.patch(
            &routes::quarterly_status(company_id.trim(), quarter, year),
            &json!({ "status": status }),
        )?;
        let records = self.records(company_id, quarter, year)?;
        let key = DeclarationKey::new(company_id, quarter, year);
        if declarations::records_in(&records, &key).is_empty() {
            return Err(IftaError::NotFound(format!("declaration {}", key)));
        }
        log::info!("Declaration {} marked {}", key, status);
        Ok(records)
    }
}
