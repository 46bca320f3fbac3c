//! Session persistence across restarts.
//!
//! A successful login yields a token that is stored on disk so the next
//! start can skip the credential and second-factor exchange while the
//! token is still accepted.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileSessionStore;

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An authenticated API session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent with every API request.
    pub token: String,

    /// Account identifier returned by the login call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    /// Creates a session for the given token.
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: Option<String>) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// What [`SessionStore::load`] found.
#[derive(Debug, Clone)]
pub enum LoadResult {
    /// A session from an earlier run.
    Loaded(Session),

    /// Nothing saved yet.
    NotFound,

    /// Something is saved but cannot be used; the next login replaces it.
    Corrupted {
        /// What was wrong with it
        reason: String,
    },
}

/// Failure to persist or forget a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session file could not be written or removed.
    #[error("Failed to write session file: {0}")]
    Write(#[source] io::Error),

    /// The session could not be encoded.
    #[error("Failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Where the session token survives restarts.
///
/// Reading never fails: unusable data is reported as
/// [`LoadResult::Corrupted`] so the caller simply logs in again.
pub trait SessionStore: Send + Sync {
    /// Loads the previously saved session.
    fn load(&self) -> LoadResult;

    /// Saves the session for future runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn save(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;

    /// Forgets the saved session (e.g. after the server rejected it).
    ///
    /// # Errors
    ///
    /// Returns an error if an existing session cannot be removed.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}
