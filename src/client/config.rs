//! Options handed to the cloud client at construction.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::config::{Credentials, TfaSettings, ValidatedConfig, defaults};

/// Everything the cloud client needs to log in and watch devices.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Account credentials
    pub credentials: Credentials,
    /// Second-factor settings
    pub tfa: TfaSettings,
    /// Interval after which the client logs in again to refresh its session
    pub reconnect_every: Duration,
    /// Interval between device state polls
    pub event_poll_interval: Duration,
    /// Run handlers on the polling task instead of a blocking worker
    pub synchronous_mode: bool,
    /// Persist the session token between runs
    pub save_state: bool,
    /// Directory for the persisted session
    pub storage_dir: PathBuf,
    /// Media save path template
    pub save_media_to: Option<String>,
    /// Log every API request
    pub verbose_debug: bool,
    /// Log raw device payloads
    pub dump: bool,
    /// Cloud API base URL
    pub api_url: Url,
}

impl ClientConfig {
    /// Creates a configuration with the fixed operational defaults.
    #[must_use]
    pub fn new(credentials: Credentials, tfa: TfaSettings, api_url: Url) -> Self {
        Self {
            credentials,
            tfa,
            reconnect_every: defaults::reconnect_every(),
            event_poll_interval: defaults::event_poll_interval(),
            synchronous_mode: false,
            save_state: true,
            storage_dir: PathBuf::from(defaults::STORAGE_DIR),
            save_media_to: None,
            verbose_debug: false,
            dump: false,
            api_url,
        }
    }
}

impl From<&ValidatedConfig> for ClientConfig {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            save_media_to: config.save_media_to.clone(),
            verbose_debug: config.debug_level.verbose_debug(),
            dump: config.debug_level.dump(),
            ..Self::new(
                config.credentials.clone(),
                config.tfa.clone(),
                config.api_url.clone(),
            )
        }
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reconnect_every={}s, poll={}s, synchronous_mode={}, save_state={}, storage_dir={}, save_media_to={}",
            self.reconnect_every.as_secs(),
            self.event_poll_interval.as_secs(),
            self.synchronous_mode,
            self.save_state,
            self.storage_dir.display(),
            self.save_media_to.as_deref().unwrap_or("none"),
        )
    }
}
