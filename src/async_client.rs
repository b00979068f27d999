//! Async wrapper around [`IftaSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client waits on the network.
//!
//! # Example
//!
//! ```ignore
//! use ifta_sdk::{AsyncIftaSdk, Quarter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncIftaSdk::builder().build().await.unwrap();
//!     sdk.login("ops@example.com", "secret").await.unwrap();
//!
//!     let summary = sdk.summary("company-1", Quarter::Q2, 2024).await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let companies = sdk.run(|s| s.companies().list()).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{IftaError, Result};
use crate::models::{Quarter, QuarterlySummary};
use crate::session::Session;
use crate::{config, IftaSdk};

// ---------------------------------------------------------------------------
// AsyncIftaSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncIftaSdk`] instance.
pub struct AsyncIftaSdkBuilder {
    base_url: Option<String>,
    timeout: Duration,
    token_path: Option<PathBuf>,
    persist_session: bool,
}

impl Default for AsyncIftaSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: config::DEFAULT_TIMEOUT,
            token_path: None,
            persist_session: true,
        }
    }
}

impl AsyncIftaSdkBuilder {
    /// Set the API base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Set the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set where the session file is kept.
    pub fn token_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.token_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable persisting the session between runs.
    pub fn persist_session(mut self, persist: bool) -> Self {
        self.persist_session = persist;
        self
    }

    /// Build the async SDK.
    ///
    /// Initialization runs on the blocking thread pool so reading the session
    /// file won't block the async event loop.
    pub async fn build(self) -> Result<AsyncIftaSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = IftaSdk::builder()
                .timeout(self.timeout)
                .persist_session(self.persist_session);
            if let Some(url) = self.base_url {
                builder = builder.base_url(&url);
            }
            if let Some(path) = self.token_path {
                builder = builder.token_path(path);
            }
            let sdk = builder.build()?;
            Ok(AsyncIftaSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| IftaError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncIftaSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`IftaSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`IftaSdk`] is protected
/// by a [`Mutex`] since it uses `RefCell` internally.
pub struct AsyncIftaSdk {
    inner: Arc<Mutex<IftaSdk>>,
}

impl AsyncIftaSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncIftaSdkBuilder {
        AsyncIftaSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&IftaSdk` reference and should return a
    /// `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&IftaSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| IftaError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| IftaError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Log in and make the resulting session current.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.to_string();
        let password = password.to_string();
        self.run(move |s| s.login(&email, &password)).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.run(|s| s.logout()).await
    }

    pub async fn session(&self) -> Result<Session> {
        self.run(|s| Ok(s.session())).await
    }

    /// Fetch and aggregate one company-quarter.
    pub async fn summary(
        &self,
        company_id: &str,
        quarter: Quarter,
        year: i32,
    ) -> Result<QuarterlySummary> {
        let company_id = company_id.to_string();
        self.run(move |s| s.declarations().summary(&company_id, quarter, year))
            .await
    }

    /// Close the SDK, releasing all resources.
    ///
    /// The HTTP client is dropped on the blocking pool, where dropping it is
    /// allowed.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let sdk = self
                .inner
                .lock()
                .map_err(|_| IftaError::InvalidArgument("SDK lock poisoned".into()))?;
            drop(sdk);
            Ok(())
        })
        .await
        .map_err(|e| IftaError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
