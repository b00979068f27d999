use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::{IftaError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, alias = "_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ifta_account_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub dot_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub trashed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifta_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dot_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(IftaError::InvalidArgument("company name is required".into()));
        }
        if let Some(email) = &self.email {
            let email = email.trim();
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid {
                return Err(IftaError::InvalidArgument(format!(
                    "invalid contact email '{}'",
                    email
                )));
            }
        }
        if let Some(dot) = &self.dot_number {
            if !dot.trim().chars().all(|c| c.is_ascii_digit()) {
                return Err(IftaError::InvalidArgument(format!(
                    "DOT number must be numeric, got '{}'",
                    dot
                )));
            }
        }
        Ok(())
    }
}

impl From<&Company> for NewCompany {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            ifta_account_number: company.ifta_account_number.clone(),
            dot_number: company.dot_number.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
            address: company.address.clone(),
        }
    }
}
