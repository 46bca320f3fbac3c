//! Error types for configuration resolution and the configuration store.

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers store key errors, environment parsing, and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Lookup of a key the store does not hold.
    #[error("Unknown configuration key '{key}'")]
    UnknownKey {
        /// The key that was looked up
        key: String,
    },

    /// Write to a key outside the allow-list.
    #[error("Name '{key}' not accepted in set()")]
    KeyNotWritable {
        /// The rejected key
        key: String,
    },

    /// A value of the wrong type was supplied for a key.
    #[error("Configuration key '{key}' expects {expected}")]
    TypeMismatch {
        /// The key whose value has the wrong type
        key: &'static str,
        /// Human readable description of the expected type
        expected: &'static str,
    },

    /// Missing required value that must be provided by the environment.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// An environment variable holds a value that cannot be parsed.
    #[error("Invalid value '{value}' for environment variable {name}: {reason}")]
    InvalidEnv {
        /// Name of the environment variable
        name: &'static str,
        /// The raw value
        value: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid URL provided.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The account username variable.
    pub const USERNAME: &str = "ARLO_USERNAME";
    /// The account password variable.
    pub const PASSWORD: &str = "ARLO_PASSWORD";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }

    /// Returns true for errors caused by a missing account credential.
    #[must_use]
    pub fn is_missing_credentials(&self) -> bool {
        matches!(
            self,
            Self::MissingRequired { field: f, .. } if *f == field::USERNAME || *f == field::PASSWORD
        )
    }
}
