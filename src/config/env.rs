//! Process environment snapshot.
//!
//! The environment is read once at startup so the rest of configuration
//! resolution is a pure function of [`Cli`](super::Cli) and [`Environment`].

use std::collections::HashMap;

use super::error::ConfigError;

/// Environment variable names consumed by the application.
pub mod var {
    /// Account username.
    pub const USERNAME: &str = "ARLO_USERNAME";
    /// Account password.
    pub const PASSWORD: &str = "ARLO_PASSWORD";
    /// Default media save path template.
    pub const SAVE_MEDIA_TO: &str = "SAVE_MEDIA_TO";
    /// Debug level (0-3), combined with `--debug` by maximum.
    pub const DEBUG: &str = "DEBUG";
    /// Cloud API base URL override.
    pub const API_URL: &str = "ARLO_API_URL";
    /// Error telemetry endpoint (not supported, only reported).
    pub const SENTRY_DSN: &str = "SENTRY_DSN";

    /// All variables captured by [`super::Environment::from_process`].
    pub const ALL: [&str; 6] = [USERNAME, PASSWORD, SAVE_MEDIA_TO, DEBUG, API_URL, SENTRY_DSN];
}

/// Immutable snapshot of the environment variables this program reads.
///
/// Empty values are kept as-is; it is up to the consumer to decide
/// whether an empty string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Captures the relevant variables from the current process.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_pairs(
            var::ALL
                .iter()
                .filter_map(|name| std::env::var(name).ok().map(|value| (*name, value))),
        )
    }

    /// Builds an environment from explicit key/value pairs (useful for testing).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the raw value of a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns the value of a variable, treating an empty string as unset.
    #[must_use]
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Parses `DEBUG` as an unsigned level, defaulting to 0 when unset or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when the value is not a non-negative integer.
    pub fn debug_level(&self) -> Result<u8, ConfigError> {
        let Some(raw) = self.non_empty(var::DEBUG) else {
            return Ok(0);
        };

        let trimmed = raw.trim();
        let parsed: u64 = trimmed.parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::InvalidEnv {
                name: var::DEBUG,
                value: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(u8::try_from(parsed).unwrap_or(u8::MAX))
    }
}
