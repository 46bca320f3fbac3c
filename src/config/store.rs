//! Key/value configuration store with a write allow-list.
//!
//! The store is built once from hardcoded defaults plus `SAVE_MEDIA_TO`,
//! receives CLI overrides through [`ConfigStore::set`], and is then frozen
//! into a [`ValidatedConfig`](super::ValidatedConfig).

use std::collections::BTreeMap;
use std::fmt;

use super::defaults;
use super::error::ConfigError;

/// Configuration key names.
pub mod key {
    /// Media save path template.
    pub const SAVE_MEDIA_TO: &str = "save_media_to";
    /// Two-factor authentication type.
    pub const TFA_TYPE: &str = "tfa_type";
    /// Two-factor authentication source.
    pub const TFA_SOURCE: &str = "tfa_source";
    /// Number of second-factor approval checks.
    pub const TFA_RETRIES: &str = "tfa_retries";
    /// Seconds between approval checks.
    pub const TFA_DELAY: &str = "tfa_delay";
    /// IMAP host.
    pub const TFA_HOST: &str = "tfa_host";
    /// IMAP username.
    pub const TFA_USERNAME: &str = "tfa_username";
    /// IMAP password.
    pub const TFA_PASSWORD: &str = "tfa_password";
    /// Recognized setter without a default.
    pub const SET_LOGGER: &str = "set_logger";
}

/// Keys that carry a default value.
pub const DEFAULTED_KEYS: [&str; 8] = [
    key::SAVE_MEDIA_TO,
    key::TFA_TYPE,
    key::TFA_SOURCE,
    key::TFA_RETRIES,
    key::TFA_DELAY,
    key::TFA_HOST,
    key::TFA_USERNAME,
    key::TFA_PASSWORD,
];

/// Keys accepted by [`ConfigStore::set`].
pub const WRITABLE_KEYS: [&str; 9] = [
    key::SET_LOGGER,
    key::SAVE_MEDIA_TO,
    key::TFA_TYPE,
    key::TFA_SOURCE,
    key::TFA_RETRIES,
    key::TFA_DELAY,
    key::TFA_HOST,
    key::TFA_USERNAME,
    key::TFA_PASSWORD,
];

/// An untyped configuration scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// No value (e.g. `SAVE_MEDIA_TO` unset).
    Null,
    /// A string value.
    Text(String),
    /// A non-negative integer value.
    Integer(u64),
}

impl ConfigValue {
    /// Returns the string value, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Null | Self::Integer(_) => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Returns true for [`ConfigValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for ConfigValue {
    fn from(value: u32) -> Self {
        Self::Integer(u64::from(value))
    }
}

impl From<u64> for ConfigValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Configuration store.
///
/// Reads fail for keys the store does not hold; writes fail for keys
/// outside [`WRITABLE_KEYS`] and leave the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    entries: BTreeMap<&'static str, ConfigValue>,
}

impl ConfigStore {
    /// Creates a store holding the built-in defaults.
    ///
    /// `save_media_to` is the value of `SAVE_MEDIA_TO`, if set.
    #[must_use]
    pub fn with_defaults(save_media_to: Option<&str>) -> Self {
        let entries = BTreeMap::from([
            (key::SAVE_MEDIA_TO, ConfigValue::from(save_media_to)),
            (key::TFA_TYPE, ConfigValue::from(defaults::TFA_TYPE)),
            (key::TFA_SOURCE, ConfigValue::from(defaults::TFA_SOURCE)),
            (key::TFA_RETRIES, ConfigValue::from(defaults::TFA_RETRIES)),
            (key::TFA_DELAY, ConfigValue::from(defaults::TFA_DELAY_SECS)),
            (key::TFA_HOST, ConfigValue::from(defaults::TFA_HOST)),
            (key::TFA_USERNAME, ConfigValue::from(defaults::TFA_USERNAME)),
            (key::TFA_PASSWORD, ConfigValue::from(defaults::TFA_PASSWORD)),
        ]);

        Self { entries }
    }

    /// Returns the current value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] if the store holds no such key.
    pub fn get(&self, key: &str) -> Result<&ConfigValue, ConfigError> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey {
                key: key.to_string(),
            })
    }

    /// Overwrites the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyNotWritable`] if `key` is not in [`WRITABLE_KEYS`].
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let canonical = WRITABLE_KEYS
            .iter()
            .copied()
            .find(|k| *k == key)
            .ok_or_else(|| ConfigError::KeyNotWritable {
                key: key.to_string(),
            })?;

        self.entries.insert(canonical, value.into());
        Ok(())
    }

    /// Returns every key/value pair currently held.
    #[must_use]
    pub const fn dump_all(&self) -> &BTreeMap<&'static str, ConfigValue> {
        &self.entries
    }

    /// Returns a text value.
    ///
    /// # Errors
    ///
    /// Fails if the key is unknown or holds a non-text value.
    pub fn text(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key)?.as_text().ok_or(ConfigError::TypeMismatch {
            key,
            expected: "a string",
        })
    }

    /// Returns a text value that may be null.
    ///
    /// # Errors
    ///
    /// Fails if the key is unknown or holds an integer.
    pub fn optional_text(&self, key: &'static str) -> Result<Option<&str>, ConfigError> {
        let value = self.get(key)?;
        if value.is_null() {
            return Ok(None);
        }
        value.as_text().map(Some).ok_or(ConfigError::TypeMismatch {
            key,
            expected: "a string or nothing",
        })
    }

    /// Returns an integer value.
    ///
    /// # Errors
    ///
    /// Fails if the key is unknown or holds a non-integer value.
    pub fn integer(&self, key: &'static str) -> Result<u64, ConfigError> {
        self.get(key)?.as_integer().ok_or(ConfigError::TypeMismatch {
            key,
            expected: "an integer",
        })
    }
}
