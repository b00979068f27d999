use std::path::PathBuf;
use std::time::Duration;

use crate::models::Quarter;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
pub const API_URL_ENV: &str = "IFTA_API_URL";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LANDING_PATH: &str = "/admin";
pub const CLIENT_LANDING_PATH: &str = "/dashboard";

/// Base URL from `IFTA_API_URL`, or the local development default.
pub fn default_api_url() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub fn default_token_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("ifta-sdk").join("session.json")
    } else {
        PathBuf::from(".ifta-sdk").join("session.json")
    }
}

// ---------------------------------------------------------------------------
// REST routes
// ---------------------------------------------------------------------------

pub mod routes {
    use std::borrow::Cow;

    use super::Quarter;

    pub const LOGIN: &str = "/auth/login";
    pub const ME: &str = "/auth/me";
    pub const REPORTS: &str = "/reports";
    pub const TRASHED_REPORTS: &str = "/reports/trash";
    pub const COMPANIES: &str = "/companies";

    /// Percent-encode one path segment so ids never add segments or a query.
    fn seg(id: &str) -> Cow<'_, str> {
        urlencoding::encode(id)
    }

    pub fn report(id: &str) -> String {
        format!("{}/{}", REPORTS, seg(id))
    }

    pub fn report_action(id: &str, action: &str) -> String {
        format!("{}/{}/{}", REPORTS, seg(id), action)
    }

    pub fn company_reports(company_id: &str) -> String {
        format!("{}/company/{}", REPORTS, seg(company_id))
    }

    pub fn company(id: &str) -> String {
        format!("{}/{}", COMPANIES, seg(id))
    }

    pub fn company_action(id: &str, action: &str) -> String {
        format!("{}/{}/{}", COMPANIES, seg(id), action)
    }

    pub fn quarterly(company_id: &str, quarter: Quarter, year: i32) -> String {
        format!(
            "/quarterly-reports/company/{}/quarter/{}/year/{}",
            seg(company_id),
            quarter.number(),
            year
        )
    }

    pub fn quarterly_status(company_id: &str, quarter: Quarter, year: i32) -> String {
        format!("{}/status", quarterly(company_id, quarter, year))
    }
}
