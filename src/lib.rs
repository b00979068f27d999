//! IFTA reporting SDK for Rust.
//!
//! Provides a typed client for an IFTA (International Fuel Tax Agreement)
//! reporting backend: consumption reports, companies and quarterly
//! declarations, plus the session and role gate a front end routes with.
//! The quarterly aggregation that turns per-vehicle, per-state monthly records
//! into declaration summaries is a pure function in [`aggregate`] and needs no
//! connection at all.
//!
//! # Quick start
//!
//! ```no_run
//! use ifta_sdk::{IftaSdk, Quarter};
//!
//! let sdk = IftaSdk::builder()
//!     .base_url("https://ifta.example.com/api")
//!     .build()
//!     .unwrap();
//!
//! sdk.login("ops@example.com", "secret").unwrap();
//!
//! let summary = sdk.declarations().summary("company-1", Quarter::Q1, 2024).unwrap();
//! for state in &summary.state_summary {
//!     println!("{}: {} mi / {} gal = {} mpg", state.state, state.miles, state.gallons, state.mpg);
//! }
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod aggregate;
pub mod api;
pub mod config;
pub mod connection;
pub mod declarations;
pub mod error;
pub mod models;
pub mod session;
pub mod token_store;

pub use aggregate::{aggregate, summarize_active};
#[cfg(feature = "async")]
pub use async_client::AsyncIftaSdk;
pub use connection::Connection;
pub use error::{IftaError, Result};
pub use models::{
    Company, ConsumptionRecord, NewCompany, NewConsumptionRecord, Quarter, QuarterlyDeclaration,
    QuarterlySummary, ReportStatus, Role, StateEntry, User,
};
pub use session::{Access, RouteGuard, Session};
pub use token_store::TokenStore;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// IftaSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`IftaSdk`] instance.
///
/// Use [`IftaSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](IftaSdkBuilder::build) to create the SDK.
pub struct IftaSdkBuilder {
    base_url: Option<String>,
    timeout: Duration,
    token_path: Option<PathBuf>,
    persist_session: bool,
}

impl Default for IftaSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            token_path: None,
            persist_session: true,
        }
    }
}

impl IftaSdkBuilder {
    /// Set the API base URL.
    ///
    /// If not set, `IFTA_API_URL` is read from the environment, falling back
    /// to `http://localhost:4000/api`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set where the session file is kept.
    ///
    /// Defaults to `ifta-sdk/session.json` under the platform config
    /// directory (e.g. `~/.config` on Linux).
    pub fn token_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.token_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable persisting the session between runs.
    ///
    /// When disabled, nothing is read from or written to disk. Defaults to
    /// `true`.
    pub fn persist_session(mut self, persist: bool) -> Self {
        self.persist_session = persist;
        self
    }

    /// Build the SDK, restoring a persisted session if there is one.
    ///
    /// No network traffic happens here.
    pub fn build(self) -> Result<IftaSdk> {
        let base_url = self.base_url.unwrap_or_else(config::default_api_url);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(IftaError::InvalidArgument(format!(
                "base URL must be http(s): {}",
                base_url
            )));
        }

        let store = if self.persist_session {
            Some(TokenStore::new(self.token_path))
        } else {
            None
        };
        let session = match &store {
            Some(store) => store.load_session()?,
            None => Session::Anonymous,
        };
        if let Some(user) = session.user() {
            log::info!("Restored session for {}", user.email);
        }

        let conn = Connection::new(&base_url, self.timeout, session);
        Ok(IftaSdk { conn, store })
    }
}

// ---------------------------------------------------------------------------
// IftaSdk
// ---------------------------------------------------------------------------

/// The main entry point for the IFTA SDK.
///
/// Wraps a [`Connection`] (which owns the HTTP client and current
/// [`Session`]) and exposes the API groups as lightweight borrowing wrappers.
///
/// Created via [`IftaSdk::builder()`].
pub struct IftaSdk {
    conn: Connection,
    store: Option<TokenStore>,
}

impl IftaSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> IftaSdkBuilder {
        IftaSdkBuilder::default()
    }

    // -- API accessors -----------------------------------------------------

    /// Access the consumption report endpoints.
    pub fn reports(&self) -> api::ReportApi<'_> {
        api::ReportApi::new(&self.conn)
    }

    /// Access the company endpoints.
    pub fn companies(&self) -> api::CompanyApi<'_> {
        api::CompanyApi::new(&self.conn)
    }

    /// Access quarterly declarations and their summaries.
    pub fn declarations(&self) -> api::DeclarationApi<'_> {
        api::DeclarationApi::new(&self.conn)
    }

    /// Access the raw authentication endpoints.
    ///
    /// Prefer [`login()`](Self::login) and [`logout()`](Self::logout), which
    /// also update the current session.
    pub fn auth(&self) -> api::AuthApi<'_> {
        api::AuthApi::new(&self.conn)
    }

    // -- Session -----------------------------------------------------------

    /// A copy of the current session.
    pub fn session(&self) -> Session {
        self.conn.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.conn.session().is_authenticated()
    }

    /// Log in and make the resulting session current.
    ///
    /// The session is persisted when persistence is enabled. On failure the
    /// previous session is left untouched.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let response = self.auth().login(email, password)?;
        let session = self.conn.take_session().login(response);
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&session) {
                log::warn!("Could not persist session: {}", e);
            }
        }
        if let (Some(user), Some(role)) = (session.user(), session.role()) {
            log::info!("Logged in as {} ({})", user.email, role);
        }
        self.conn.set_session(session.clone());
        Ok(session)
    }

    /// Drop the current session and its persisted copy.
    pub fn logout(&self) -> Result<()> {
        let session = self.conn.take_session().logout();
        self.conn.set_session(session);
        if let Some(store) = &self.store {
            store.clear()?;
        }
        log::info!("Logged out");
        Ok(())
    }

    /// Install an externally obtained session, e.g. one restored by the
    /// caller.
    pub fn set_session(&self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        self.conn.set_session(session);
        Ok(())
    }

    // -- Routing -----------------------------------------------------------

    /// Check whether the current session may open `requested_path`.
    pub fn guard(&self, requested_path: &str, allowed: &[Role]) -> Access {
        RouteGuard::check(&self.conn.session(), requested_path, allowed)
    }

    /// Where to go after a successful login.
    pub fn post_login_redirect(&self, return_to: Option<&str>) -> String {
        RouteGuard::post_login_redirect(&self.conn.session(), return_to)
    }

    // -- Misc --------------------------------------------------------------

    /// Path of the persisted session file, when persistence is enabled.
    pub fn token_path(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.path.as_path())
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the SDK and release all resources.
    pub fn close(self) {
        drop(self);
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for IftaSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.conn.session();
        let user = session
            .user()
            .map(|u| u.email.as_str())
            .unwrap_or("anonymous");
        write!(
            f,
            "IftaSdk(base_url={}, user={}, authenticated={}, persist={})",
            self.conn.base_url(),
            user,
            session.is_authenticated(),
            self.store.is_some()
        )
    }
}
