//! Typed wrappers around the reporting REST API.
//!
//! Each wrapper borrows the [`Connection`](crate::connection::Connection) and
//! maps one method to one HTTP call. Errors from the server pass through
//! unchanged as [`IftaError::Api`](crate::error::IftaError::Api).

pub mod auth;
pub mod companies;
pub mod declarations;
pub mod reports;

pub use auth::AuthApi;
pub use companies::CompanyApi;
pub use declarations::DeclarationApi;
pub use reports::{ReportApi, ReportFilter};
