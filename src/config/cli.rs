//! CLI argument parsing using clap.
//!
//! Defines the command-line interface. Every override is optional so that
//! "flag supplied" is distinguishable from "flag omitted" regardless of value.

use clap::{Parser, ValueEnum};

/// Download records from Arlo Cameras.
///
/// Logs into the account given by `ARLO_USERNAME`/`ARLO_PASSWORD`, lists
/// base stations and cameras, and logs every attribute change until interrupted.
#[derive(Debug, Parser)]
#[command(name = "arlo-downloader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug messages. Can also be set with environment variable DEBUG=1-3
    #[arg(long, short, value_enum, default_value = "0")]
    pub debug: DebugArg,

    /// Save media naming scheme without extension (default from SAVE_MEDIA_TO)
    #[arg(long = "save-media-to", short = 'm', value_name = "TEMPLATE")]
    pub save_media_to: Option<String>,

    /// Set TFA type (default = PUSH)
    #[arg(long = "tfa-type", short = 't', value_enum)]
    pub tfa_type: Option<TfaTypeArg>,

    /// Set TFA source (default = push)
    #[arg(long = "tfa-source", short = 's', value_enum)]
    pub tfa_source: Option<TfaSourceArg>,

    /// Set TFA max retries (default = 10)
    #[arg(long = "tfa-retries", short = 'r')]
    pub tfa_retries: Option<u32>,

    /// Set TFA delay between each check in seconds (default = 5)
    #[arg(long = "tfa-delay", short = 'D')]
    pub tfa_delay: Option<u64>,

    /// (EMAIL/imap only) Set TFA host
    #[arg(long = "tfa-host", short = 'H')]
    pub tfa_host: Option<String>,

    /// (EMAIL/imap only) Set TFA username
    #[arg(long = "tfa-username", short = 'U')]
    pub tfa_username: Option<String>,

    /// (EMAIL/imap only) Set TFA password
    #[arg(long = "tfa-password", short = 'P')]
    pub tfa_password: Option<String>,
}

/// Debug level argument (closed set 0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum)]
pub enum DebugArg {
    /// Informational output only
    #[default]
    #[value(name = "0")]
    Off,
    /// Debug output
    #[value(name = "1")]
    Debug,
    /// Debug output plus verbose client diagnostics
    #[value(name = "2")]
    Verbose,
    /// Everything, including secrets and raw payload dumps
    #[value(name = "3")]
    Dump,
}

impl DebugArg {
    /// Returns the numeric level.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Debug => 1,
            Self::Verbose => 2,
            Self::Dump => 3,
        }
    }
}

/// Two-factor authentication type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TfaTypeArg {
    /// Approve the login from a push notification
    #[value(name = "PUSH")]
    Push,
    /// Receive a one-time code by e-mail
    #[value(name = "EMAIL")]
    Email,
}

impl TfaTypeArg {
    /// Returns the wire name of the TFA type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "PUSH",
            Self::Email => "EMAIL",
        }
    }
}

/// Where the second factor is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TfaSourceArg {
    /// Wait for the push approval
    #[value(name = "push")]
    Push,
    /// Read the code from an IMAP mailbox
    #[value(name = "imap")]
    Imap,
}

impl TfaSourceArg {
    /// Returns the wire name of the TFA source.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Imap => "imap",
        }
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning usage errors instead of exiting.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or values outside a closed set.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }
}
