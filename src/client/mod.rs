//! Camera service interface and its cloud implementation.
//!
//! This module provides:
//! - The service abstraction used by the bootstrap sequence ([`CameraService`])
//! - Device handles and attribute-change events ([`Device`], [`AttributeChange`])
//! - The cloud API client ([`ArloApi`]) and service ([`CloudClient`])
//! - Client options ([`ClientConfig`])

mod api;
mod cloud;
mod config;
mod device;
mod diff;
mod error;

#[cfg(test)]
mod test_fixtures;

pub use api::{ArloApi, LoginOutcome, path};
pub use cloud::CloudClient;
pub use config::ClientConfig;
pub use device::{
    AttributeChange, AttributeHandler, AttributeKey, CallbackRegistry, Device, DeviceInfo,
    DeviceKind,
};
pub use diff::{DeviceSnapshot, diff};
pub use error::ApiError;

/// A logged-in view of the camera account.
///
/// # Design
///
/// The bootstrap sequence only needs connection status, the two device
/// collections, and an event pump, so tests can substitute a fake service.
pub trait CameraService: Send + Sync {
    /// Returns true if login succeeded.
    fn is_connected(&self) -> bool;

    /// Returns the last error recorded during login, if any.
    fn last_error(&self) -> Option<&str>;

    /// Base stations on the account.
    fn base_stations(&self) -> &[Device];

    /// Cameras on the account.
    fn cameras(&self) -> &[Device];

    /// Delivers attribute changes to registered handlers.
    ///
    /// Runs until the future is dropped; expired sessions are recovered
    /// internally.
    ///
    /// # Errors
    ///
    /// Returns an error when the service was never connected.
    fn run_events(&self) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}
