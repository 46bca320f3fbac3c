//! Configuration layer.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`])
//! - Environment snapshot ([`Environment`])
//! - The allow-listed key/value store ([`ConfigStore`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Default values ([`defaults`])
//!
//! # Resolution
//!
//! 1. The store is created from built-in defaults; `save_media_to` comes from `SAVE_MEDIA_TO`.
//! 2. Every CLI option that was supplied overwrites its store entry. An option passed
//!    with an empty string or zero still counts as supplied.
//! 3. The debug level is the maximum of `--debug` and `DEBUG`.
//! 4. Credentials come only from `ARLO_USERNAME` and `ARLO_PASSWORD`; missing
//!    credentials fail before any network call is made.
//!
//! After resolution the configuration is immutable and passed by reference.

mod cli;
pub mod defaults;
mod env;
mod error;
mod store;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, DebugArg, TfaSourceArg, TfaTypeArg};
pub use env::{Environment, var};
pub use error::{ConfigError, field};
pub use store::{ConfigStore, ConfigValue, DEFAULTED_KEYS, WRITABLE_KEYS, key};
pub use validated::{Credentials, DebugLevel, REDACTED, TfaSettings, ValidatedConfig};
