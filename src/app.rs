//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use arlo_downloader::config::{ConfigError, DebugLevel, ValidatedConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success or operator interrupt (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - missing credentials, malformed `DEBUG`, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - login failure, event pump failure, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    if error.is_missing_credentials() {
        eprintln!("\nSet ARLO_USERNAME and ARLO_PASSWORD in the environment before starting.");
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Any non-zero debug level enables `DEBUG`; `RUST_LOG` refines the default.
pub fn setup_tracing(level: DebugLevel) {
    let default = if level.is_debug() {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Logs the resolved configuration.
///
/// The summary goes to `INFO`; every stored key is dumped at `DEBUG`.
pub fn log_config(config: &ValidatedConfig) {
    tracing::info!("{config}");
    for (key, value) in config.dump_lines() {
        tracing::debug!("config: {key}={value}");
    }
    if config.telemetry_requested {
        tracing::info!("SENTRY_DSN is set but telemetry is disabled in this build");
    }
}
