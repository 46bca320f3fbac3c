//! Backoff for transient cloud API failures.

use std::time::Duration;

use super::HttpError;

/// How often and how patiently a failed API call is repeated.
///
/// The wait doubles after every failed attempt, starting at
/// `initial_delay` and never exceeding `max_delay`.
///
/// ```
/// use arlo_downloader::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new().with_initial_delay(Duration::from_secs(1));
/// assert_eq!(policy.delay_for_retry(2), Duration::from_secs(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per call, the first one included. Never below 1.
    pub max_attempts: u32,
    /// Wait before the first repeat.
    pub initial_delay: Duration,
    /// Upper bound for any single wait.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Three attempts, waiting 2 s then 4 s, capped at 30 s.
    pub const DEFAULT: Self = Self {
        max_attempts: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(30),
    };

    /// Creates the default policy.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Sets the attempt count; zero is raised to one.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Sets the first wait.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the cap on any single wait.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait before repeat number `retry` (0-based).
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Returns true if attempt number `attempt` (1-based) may be followed by another.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies failures as transient or permanent.
pub trait IsRetryable {
    /// Returns true if repeating the call may succeed.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }
}

/// Server errors, throttling and request timeouts are transient.
impl IsRetryable for http::StatusCode {
    fn is_retryable(&self) -> bool {
        self.is_server_error() || *self == Self::TOO_MANY_REQUESTS || *self == Self::REQUEST_TIMEOUT
    }
}
