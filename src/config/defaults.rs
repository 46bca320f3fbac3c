//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default two-factor authentication type.
pub const TFA_TYPE: &str = "PUSH";

/// Default two-factor authentication source.
pub const TFA_SOURCE: &str = "push";

/// Default number of second-factor approval checks.
pub const TFA_RETRIES: u32 = 10;

/// Default delay between second-factor approval checks, in seconds.
pub const TFA_DELAY_SECS: u64 = 5;

/// Default IMAP host (EMAIL/imap only).
pub const TFA_HOST: &str = "";

/// Default IMAP username (EMAIL/imap only).
pub const TFA_USERNAME: &str = "";

/// Default IMAP password (EMAIL/imap only).
pub const TFA_PASSWORD: &str = "";

/// Interval after which the client logs in again, in seconds.
pub const RECONNECT_EVERY_SECS: u64 = 110;

/// Interval between device state polls, in seconds.
pub const EVENT_POLL_INTERVAL_SECS: u64 = 15;

/// Directory holding the persisted session.
pub const STORAGE_DIR: &str = "aarlo";

/// Base URL of the cloud API.
pub const API_URL: &str = "https://myapi.arlo.com";

/// Maximum number of characters of an attribute value written to the log.
pub const ATTRIBUTE_VALUE_MAX_CHARS: usize = 80;

/// Default reconnect interval as Duration.
#[must_use]
pub const fn reconnect_every() -> Duration {
    Duration::from_secs(RECONNECT_EVERY_SECS)
}

/// Default event poll interval as Duration.
#[must_use]
pub const fn event_poll_interval() -> Duration {
    Duration::from_secs(EVENT_POLL_INTERVAL_SECS)
}
