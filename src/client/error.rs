//! Error types for the cloud API.

use thiserror::Error;

use crate::transport::{HttpError, IsRetryable};

/// Error type for cloud API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport failed before a response arrived.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The server answered with an unexpected status code.
    #[error("Unexpected HTTP status {status}{}", body.as_ref().map(|b| format!(": {b}")).unwrap_or_default())]
    Status {
        /// HTTP status code
        status: http::StatusCode,
        /// Response body, if it was valid UTF-8
        body: Option<String>,
    },

    /// The session token is no longer accepted.
    #[error("Session is not authorized")]
    Unauthorized,

    /// The server refused the request (`success: false`).
    #[error("Request rejected: {reason}")]
    Rejected {
        /// Reason reported by the server
        reason: String,
    },

    /// The second factor was not approved in time.
    #[error("Two-factor approval not received after {checks} check(s)")]
    ApprovalTimedOut {
        /// Number of approval checks performed
        checks: u32,
    },

    /// A payload could not be encoded or decoded.
    #[error("Malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation that needs a session was attempted while disconnected.
    #[error("Not connected")]
    NotConnected,
}

impl IsRetryable for ApiError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_retryable(),
            Self::Status { status, .. } => status.is_retryable(),
            Self::Unauthorized
            | Self::Rejected { .. }
            | Self::ApprovalTimedOut { .. }
            | Self::Json(_)
            | Self::NotConnected => false,
        }
    }
}
