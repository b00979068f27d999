//! Company endpoints.

use serde_json::{json, Value};

use crate::config::routes;
use crate::connection::Connection;
use crate::error::{IftaError, Result};
use crate::models::{Company, NewCompany};

pub struct CompanyApi<'a> {
    conn: &'a Connection,
}

impl<'a> CompanyApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> Result<Vec<Company>> {
        self.conn.get(routes::COMPANIES)
    }

    /// Fetch one company. A 404 is `Ok(None)`.
    pub fn get(&self, id: &str) -> Result<Option<Company>> {
        match self.conn.get(&routes::company(id)) {
            Ok(company) => Ok(Some(company)),
            Err(IftaError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn create(&self, company: &NewCompany) -> Result<Company> {
        company.validate()?;
        self.conn.post(routes::COMPANIES, company)
    }

    pub fn update(&self, id: &str, company: &NewCompany) -> Result<Company> {
        company.validate()?;
        self.conn.put(&routes::company(id), company)
    }

    pub fn trash(&self, id: &str) -> Result<()> {
        let _: Value = self
            .conn
            .patch(&routes::company_action(id, "trash"), &json!({}))?;
        Ok(())
    }
}
