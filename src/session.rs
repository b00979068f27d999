//! Session state and the role gate used for screen routing.
//!
//! A [`Session`] is a plain value. Logging in or out produces a new value; the
//! SDK only swaps which value is current. The gate decides where a user may go
//! based on that value. It is a routing convenience: the server remains the
//! authority on what a token may do.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::{LoginResponse, Role, User};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedSession {
    pub token: String,
    pub user: User,
    pub role: Role,
    /// From the token's `exp` claim, when it has one.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedSession),
}

impl Session {
    /// Build a session from a token and its user, deciding the role once.
    /// An empty token yields [`Session::Anonymous`].
    pub fn restore(token: String, user: User) -> Session {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Session::Anonymous;
        }
        let role = user.role();
        let expires_at = token_expiry(&token);
        Session::Authenticated(AuthenticatedSession {
            token,
            user,
            role,
            expires_at,
        })
    }

    /// Transition to the session described by a successful login.
    pub fn login(self, response: LoginResponse) -> Session {
        Session::restore(response.token, response.user)
    }

    pub fn logout(self) -> Session {
        Session::Anonymous
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Session::Anonymous => false,
            Session::Authenticated(s) => {
                !s.token.is_empty() && s.expires_at.map(|exp| now < exp).unwrap_or(true)
            }
        }
    }

    /// The bearer token, if the session is currently valid.
    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated(s) if self.is_authenticated() => Some(s.token.as_str()),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(s) => Some(&s.user),
            Session::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Authenticated(s) => Some(s.role),
            Session::Anonymous => None,
        }
    }

    /// Authenticated and holding one of `allowed`. An empty `allowed` list
    /// admits any authenticated user.
    pub fn has_role(&self, allowed: &[Role]) -> bool {
        self.has_role_at(allowed, Utc::now())
    }

    pub fn has_role_at(&self, allowed: &[Role], now: DateTime<Utc>) -> bool {
        if !self.is_authenticated_at(now) {
            return false;
        }
        match self.role() {
            Some(role) => allowed.is_empty() || allowed.contains(&role),
            None => false,
        }
    }
}

/// Read the `exp` claim of a JWT without verifying it. Opaque tokens and
/// tokens without `exp` return `None`.
fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?;
    let exp = exp
        .as_i64()
        .or_else(|| exp.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
    DateTime::from_timestamp(exp, 0)
}

// ---------------------------------------------------------------------------
// Route gate
// ---------------------------------------------------------------------------

/// Outcome of checking a screen against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// No valid token. `return_to` is the originally requested path.
    RedirectToLogin { return_to: String },
    /// Authenticated, but the role may not see this screen.
    RedirectToLanding { path: &'static str },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }

    /// Where the caller should navigate, or `None` when access is granted.
    pub fn redirect_path(&self) -> Option<String> {
        match self {
            Access::Granted => None,
            Access::RedirectToLogin { return_to } => Some(format!(
                "{}?returnTo={}",
                config::LOGIN_PATH,
                urlencoding::encode(return_to)
            )),
            Access::RedirectToLanding { path } => Some((*path).to_string()),
        }
    }
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn check(session: &Session, requested_path: &str, allowed: &[Role]) -> Access {
        Self::check_at(session, requested_path, allowed, Utc::now())
    }

    pub fn check_at(
        session: &Session,
        requested_path: &str,
        allowed: &[Role],
        now: DateTime<Utc>,
    ) -> Access {
        if !session.is_authenticated_at(now) {
            return Access::RedirectToLogin {
                return_to: requested_path.to_string(),
            };
        }
        if session.has_role_at(allowed, now) {
            return Access::Granted;
        }
        let path = session
            .role()
            .map(|r| r.landing_path())
            .unwrap_or(config::LOGIN_PATH);
        Access::RedirectToLanding { path }
    }

    /// Where to send a user right after login: the preserved path when it is
    /// a local path other than the login screen, otherwise the role's landing
    /// page.
    pub fn post_login_redirect(session: &Session, return_to: Option<&str>) -> String {
        let Some(role) = session.role().filter(|_| session.is_authenticated()) else {
            return config::LOGIN_PATH.to_string();
        };
        match return_to.map(str::trim) {
            Some(path)
                if path.starts_with('/')
                    && !path.starts_with("//")
                    && path != config::LOGIN_PATH =>
            {
                path.to_string()
            }
            _ => role.landing_path().to_string(),
        }
    }
}
