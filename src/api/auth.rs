//! Authentication endpoints.

use crate::config::routes;
use crate::connection::Connection;
use crate::error::{IftaError, Result};
use crate::models::{LoginRequest, LoginResponse, User};

pub struct AuthApi<'a> {
    conn: &'a Connection,
}

impl<'a> AuthApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Exchange credentials for a token. Does not touch the current session;
    /// see [`IftaSdk::login`](crate::IftaSdk::login) for that.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(IftaError::InvalidArgument(
                "email and password are required".into(),
            ));
        }
        let request = LoginRequest {
            email: email.trim(),
            password,
        };
        let response: LoginResponse = self.conn.post(routes::LOGIN, &request)?;
        if response.token.trim().is_empty() {
            return Err(IftaError::Api {
                status: 200,
                payload: serde_json::json!({ "message": "login response carried no token" }),
            });
        }
        Ok(response)
    }

    /// The user behind the current token.
    pub fn me(&self) -> Result<User> {
        if !self.conn.session().is_authenticated() {
            return Err(IftaError::Unauthenticated);
        }
        self.conn.get(routes::ME)
    }
}
