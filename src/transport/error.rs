//! Transport failures.

use thiserror::Error;

/// A request that produced no HTTP response.
///
/// Status codes are not errors at this layer; callers decide what a
/// `401` or `503` means.
#[derive(Debug, Error)]
pub enum HttpError {
    /// DNS, TLS, socket or body read failure.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// No response within the client timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built from the URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
