//! On-disk persistence for the current session.
//!
//! Stores the bearer token and its user as a small JSON file so a session
//! survives restarts. This is the only local state the SDK keeps.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;
use crate::models::User;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Reads and writes the persisted session file.
pub struct TokenStore {
    /// Location of the session file.
    pub path: PathBuf,
}

impl TokenStore {
    /// Create a store at `path`, or at the platform config directory when
    /// `None`. Nothing is touched on disk until the first save.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.unwrap_or_else(config::default_token_path),
        }
    }

    /// Load the stored token and user.
    ///
    /// A missing file is `Ok(None)`. An unreadable or corrupt file is removed
    /// and also reported as `Ok(None)`, so the user simply logs in again.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) if !stored.token.trim().is_empty() => Ok(Some(stored)),
            Ok(_) => {
                log::warn!(
                    "Session file {} has an empty token -- removing",
                    self.path.display()
                );
                self.discard();
                Ok(None)
            }
            Err(e) => {
                log::warn!(
                    "Corrupt session file {}: {} -- removing",
                    self.path.display(),
                    e
                );
                self.discard();
                Ok(None)
            }
        }
    }

    /// Load the stored session, deciding its role once. Missing, corrupt or
    /// expired sessions load as [`Session::Anonymous`].
    pub fn load_session(&self) -> Result<Session> {
        let session = match self.load()? {
            Some(stored) => Session::restore(stored.token, stored.user),
            None => Session::Anonymous,
        };
        if matches!(session, Session::Authenticated(_)) && !session.is_authenticated() {
            log::info!("Stored session has expired -- discarding");
            self.clear()?;
            return Ok(Session::Anonymous);
        }
        Ok(session)
    }

    /// Persist `session`. An anonymous session clears the file.
    ///
    /// Writes to a temp file in the same directory and renames it into place,
    /// so an interrupted write never leaves a truncated file behind.
    pub fn save(&self, session: &Session) -> Result<()> {
        let Session::Authenticated(auth) = session else {
            return self.clear();
        };
        let stored = StoredSession {
            token: auth.token.clone(),
            user: auth.user.clone(),
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(&stored)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        log::debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Best-effort removal of an unusable session file.
    fn discard(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!(
                "Could not remove session file {}: {}",
                self.path.display(),
                e
            );
        }
    }

    /// Remove the session file if present.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
