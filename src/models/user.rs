use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::config;

// ---------------------------------------------------------------------------
// Role: decided once when a session is loaded
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
}

impl Role {
    /// `"admin"` in any casing is [`Role::Admin`]; every other role string,
    /// including an empty one, is [`Role::Client`].
    pub fn from_role_str(role: &str) -> Self {
        if role.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Client
        }
    }

    /// Where a user with this role lands after login or on a role mismatch.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => config::ADMIN_LANDING_PATH,
            Role::Client => config::CLIENT_LANDING_PATH,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Client => f.write_str("client"),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw role string as sent by the server.
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(
        default,
        alias = "company",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_role_str(&self.role)
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    pub user: User,
}
