//! Validated configuration after overlaying CLI arguments on the store.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction,
//! and the result is immutable for the rest of the process lifetime.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::cli::Cli;
use super::defaults;
use super::env::{Environment, var};
use super::error::{ConfigError, field};
use super::store::{ConfigStore, key};

/// Placeholder printed in place of secrets.
pub const REDACTED: &str = "***";

/// Verbosity level in `0..=3`.
///
/// - 0: informational logging
/// - 1: debug logging
/// - 2: plus verbose client diagnostics
/// - 3: plus secrets in the configuration dump and raw payload dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DebugLevel(u8);

impl DebugLevel {
    /// Highest verbosity.
    pub const MAX: u8 = 3;

    /// Combines the CLI and environment levels by maximum, saturating at [`Self::MAX`].
    #[must_use]
    pub fn resolve(cli: u8, env: u8) -> Self {
        Self::new(cli.max(env))
    }

    /// Creates a level, saturating at [`Self::MAX`].
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    /// Returns the numeric level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Debug logging is enabled.
    #[must_use]
    pub const fn is_debug(self) -> bool {
        self.0 > 0
    }

    /// The client should log its requests.
    #[must_use]
    pub const fn verbose_debug(self) -> bool {
        self.0 > 1
    }

    /// The client should dump raw event payloads.
    #[must_use]
    pub const fn dump(self) -> bool {
        self.0 > 2
    }

    /// Secrets may be written to the log.
    #[must_use]
    pub const fn reveals_secrets(self) -> bool {
        self.0 == Self::MAX
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account credentials, taken from the environment only.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account e-mail / username
    pub username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Two-factor authentication settings.
#[derive(Clone, PartialEq, Eq)]
pub struct TfaSettings {
    /// `PUSH` or `EMAIL`
    pub tfa_type: String,
    /// `push` or `imap`
    pub source: String,
    /// Number of approval checks
    pub retries: u32,
    /// Delay between approval checks
    pub delay: Duration,
    /// IMAP host
    pub host: String,
    /// IMAP username
    pub username: String,
    /// IMAP password
    pub password: String,
}

impl fmt::Debug for TfaSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfaSettings")
            .field("tfa_type", &self.tfa_type)
            .field("source", &self.source)
            .field("retries", &self.retries)
            .field("delay", &self.delay)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

impl TfaSettings {
    fn from_store(store: &ConfigStore) -> Result<Self, ConfigError> {
        let retries = u32::try_from(store.integer(key::TFA_RETRIES)?).map_err(|_| {
            ConfigError::TypeMismatch {
                key: key::TFA_RETRIES,
                expected: "an integer that fits in 32 bits",
            }
        })?;

        Ok(Self {
            tfa_type: store.text(key::TFA_TYPE)?.to_string(),
            source: store.text(key::TFA_SOURCE)?.to_string(),
            retries,
            delay: Duration::from_secs(store.integer(key::TFA_DELAY)?),
            host: store.text(key::TFA_HOST)?.to_string(),
            username: store.text(key::TFA_USERNAME)?.to_string(),
            password: store.text(key::TFA_PASSWORD)?.to_string(),
        })
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and an
/// environment snapshot, or [`ValidatedConfig::load`] for the real process.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Effective verbosity
    pub debug_level: DebugLevel,

    /// Account credentials
    pub credentials: Credentials,

    /// Two-factor authentication settings
    pub tfa: TfaSettings,

    /// Media save path template, if any
    pub save_media_to: Option<String>,

    /// Cloud API base URL
    pub api_url: Url,

    /// An error telemetry endpoint was configured
    pub telemetry_requested: bool,

    store: ConfigStore,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ user: {}, debug: {}, tfa: {}/{} ({}x every {}s), save_media_to: {}, api: {} }}",
            mask_account(&self.credentials.username),
            self.debug_level,
            self.tfa.tfa_type,
            self.tfa.source,
            self.tfa.retries,
            self.tfa.delay.as_secs(),
            self.save_media_to.as_deref().unwrap_or("none"),
            self.api_url,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and the environment.
    ///
    /// Supplied CLI values override the defaults; credentials come from the
    /// environment only.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DEBUG` is not a non-negative integer
    /// - `ARLO_USERNAME` or `ARLO_PASSWORD` is missing or empty
    /// - `ARLO_API_URL` is not a valid URL
    pub fn from_raw(cli: &Cli, env: &Environment) -> Result<Self, ConfigError> {
        let mut store = ConfigStore::with_defaults(env.non_empty(var::SAVE_MEDIA_TO));
        overlay(&mut store, cli)?;

        let debug_level = DebugLevel::resolve(cli.debug.level(), env.debug_level()?);
        let credentials = resolve_credentials(env)?;
        let tfa = TfaSettings::from_store(&store)?;
        let save_media_to = store
            .optional_text(key::SAVE_MEDIA_TO)?
            .map(ToString::to_string);
        let api_url = resolve_api_url(env)?;

        Ok(Self {
            debug_level,
            credentials,
            tfa,
            save_media_to,
            api_url,
            telemetry_requested: env.non_empty(var::SENTRY_DSN).is_some(),
            store,
        })
    }

    /// Resolves configuration against the current process environment.
    ///
    /// # Errors
    ///
    /// See [`ValidatedConfig::from_raw`].
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_raw(cli, &Environment::from_process())
    }

    /// Renders every stored setting for the diagnostic dump.
    ///
    /// `tfa_password` is shown only at the highest debug level.
    #[must_use]
    pub fn dump_lines(&self) -> Vec<(&'static str, String)> {
        self.store
            .dump_all()
            .iter()
            .map(|(k, v)| {
                if *k == key::TFA_PASSWORD && !self.debug_level.reveals_secrets() {
                    (*k, REDACTED.to_string())
                } else {
                    (*k, v.to_string())
                }
            })
            .collect()
    }
}

/// Shortens an account name to its first character and mail domain.
fn mask_account(username: &str) -> String {
    let first = username.chars().next().map(String::from).unwrap_or_default();
    match username.rsplit_once('@') {
        Some((_, domain)) => format!("{first}***@{domain}"),
        None => format!("{first}***"),
    }
}

/// Writes each supplied CLI override into the store.
fn overlay(store: &mut ConfigStore, cli: &Cli) -> Result<(), ConfigError> {
    if let Some(ref path) = cli.save_media_to {
        store.set(key::SAVE_MEDIA_TO, path.as_str())?;
    }
    if let Some(tfa_type) = cli.tfa_type {
        store.set(key::TFA_TYPE, tfa_type.as_str())?;
    }
    if let Some(source) = cli.tfa_source {
        store.set(key::TFA_SOURCE, source.as_str())?;
    }
    if let Some(retries) = cli.tfa_retries {
        store.set(key::TFA_RETRIES, retries)?;
    }
    if let Some(delay) = cli.tfa_delay {
        store.set(key::TFA_DELAY, delay)?;
    }
    if let Some(ref host) = cli.tfa_host {
        store.set(key::TFA_HOST, host.as_str())?;
    }
    if let Some(ref username) = cli.tfa_username {
        store.set(key::TFA_USERNAME, username.as_str())?;
    }
    if let Some(ref password) = cli.tfa_password {
        store.set(key::TFA_PASSWORD, password.as_str())?;
    }
    Ok(())
}

fn resolve_credentials(env: &Environment) -> Result<Credentials, ConfigError> {
    let username = env.non_empty(var::USERNAME).ok_or_else(|| {
        ConfigError::missing(field::USERNAME, "Export ARLO_USERNAME with the account e-mail")
    })?;
    let password = env.non_empty(var::PASSWORD).ok_or_else(|| {
        ConfigError::missing(field::PASSWORD, "Export ARLO_PASSWORD with the account password")
    })?;

    Ok(Credentials::new(username, password))
}

fn resolve_api_url(env: &Environment) -> Result<Url, ConfigError> {
    let raw = env.non_empty(var::API_URL).unwrap_or(defaults::API_URL);

    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}
