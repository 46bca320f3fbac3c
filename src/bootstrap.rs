//! Attaching to a logged-in camera service.
//!
//! After login the controller logs every base station and camera, then
//! registers one wildcard handler per device that logs each attribute
//! change. [`run_until`] then pumps events until the shutdown future
//! resolves.

use std::sync::Arc;

use thiserror::Error;

use crate::client::{
    ApiError, AttributeChange, AttributeKey, CameraService, Device, DeviceKind,
};
use crate::config::defaults::ATTRIBUTE_VALUE_MAX_CHARS;

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

/// Errors that end the bootstrap sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The service did not connect.
    #[error("failed to login({reason})")]
    LoginFailed {
        /// Last error reported by the service
        reason: String,
    },
}

/// Identity and state of one attached device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    /// Base station or camera
    pub kind: DeviceKind,
    /// User-visible name
    pub name: String,
    /// Unique identifier
    pub device_id: String,
    /// State at enumeration time
    pub state: String,
}

impl From<&Device> for DeviceSummary {
    fn from(device: &Device) -> Self {
        Self {
            kind: device.kind(),
            name: device.name().to_string(),
            device_id: device.device_id().to_string(),
            state: device.state().to_string(),
        }
    }
}

/// Verifies the connection, logs every device and registers change logging.
///
/// Base stations come first, then cameras, each in service order.
///
/// # Errors
///
/// Returns [`BootstrapError::LoginFailed`] if the service is not connected.
/// No device is touched in that case.
pub fn attach(service: &impl CameraService) -> Result<Vec<DeviceSummary>, BootstrapError> {
    if !service.is_connected() {
        let reason = service.last_error().unwrap_or("unknown error").to_string();
        return Err(BootstrapError::LoginFailed { reason });
    }

    let devices = service.base_stations().iter().chain(service.cameras());
    let mut summaries = Vec::new();

    for device in devices {
        tracing::info!("{}", describe_device(device));
        device.add_attr_callback(
            AttributeKey::Any,
            Arc::new(|change: &AttributeChange| {
                tracing::info!("{}", format_attribute_change(change));
            }),
        );
        summaries.push(DeviceSummary::from(device));
    }

    tracing::debug!("Watching {} device(s)", summaries.len());
    Ok(summaries)
}

/// Renders `<kind>: name=<name>,device_id=<id>,state=<state>`.
#[must_use]
pub fn describe_device(device: &Device) -> String {
    format!(
        "{}: name={},device_id={},state={}",
        device.kind().label(),
        device.name(),
        device.device_id(),
        device.state()
    )
}

/// Renders `attribute_changed:<device>:<attribute>:<value>`.
///
/// The value is cut to its first 80 characters.
#[must_use]
pub fn format_attribute_change(change: &AttributeChange) -> String {
    let value: String = change
        .value_text()
        .chars()
        .take(ATTRIBUTE_VALUE_MAX_CHARS)
        .collect();
    format!(
        "attribute_changed:{}:{}:{value}",
        change.device.name, change.attribute
    )
}

/// Pumps events until `shutdown` resolves.
///
/// Returns `Ok` on shutdown, or the pump's error if it stops first.
///
/// # Errors
///
/// Returns the service error that ended the event pump.
pub async fn run_until<F>(service: &impl CameraService, shutdown: F) -> Result<(), ApiError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    tokio::select! {
        biased;

        () = &mut shutdown => {
            tracing::info!("Shutdown signal received, stopping...");
            Ok(())
        }

        result = service.run_events() => match result {
            Ok(()) => {
                tracing::warn!("Event stream ended");
                Ok(())
            }
            Err(e) => Err(e),
        },
    }
}
