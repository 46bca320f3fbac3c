//! Device handles and attribute-change events.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Kind of device exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// A base station / hub.
    BaseStation,
    /// A camera (including doorbells and lights with a camera stream).
    Camera,
}

impl DeviceKind {
    /// Short label used in log lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BaseStation => "base",
            Self::Camera => "camera",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity and connectivity state of a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceInfo {
    /// User-visible device name
    pub name: String,
    /// Service-wide unique identifier
    pub device_id: String,
    /// Base station or camera
    pub kind: DeviceKind,
    /// Provisioning / connectivity state as reported by the service
    pub state: String,
}

impl DeviceInfo {
    /// Creates device information.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        device_id: impl Into<String>,
        kind: DeviceKind,
        state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            device_id: device_id.into(),
            kind,
            state: state.into(),
        }
    }
}

/// Which attribute changes a handler wants to see.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    /// Every attribute (`*`).
    Any,
    /// One attribute by name, e.g. `motionDetected`.
    Named(String),
}

impl AttributeKey {
    /// Returns true if a change of `attribute` should reach this key.
    #[must_use]
    pub fn matches(&self, attribute: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(name) => name == attribute,
        }
    }
}

/// A single attribute change on a device.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    /// The device the attribute belongs to
    pub device: DeviceInfo,
    /// Attribute name
    pub attribute: String,
    /// New value (`Null` when the attribute disappeared)
    pub value: serde_json::Value,
}

impl AttributeChange {
    /// Creates an attribute change event.
    #[must_use]
    pub fn new(device: DeviceInfo, attribute: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            device,
            attribute: attribute.into(),
            value,
        }
    }

    /// Renders the value for humans: strings without quotes, everything else as JSON.
    #[must_use]
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Callback invoked for matching attribute changes.
pub type AttributeHandler = Arc<dyn Fn(&AttributeChange) + Send + Sync>;

type Registration = (AttributeKey, AttributeHandler);

/// Per-device handler table shared by every [`Device`] of one service.
#[derive(Default)]
pub struct CallbackRegistry {
    handlers: RwLock<HashMap<String, Vec<Registration>>>,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for changes of `key` on `device_id`.
    pub fn register(&self, device_id: &str, key: AttributeKey, handler: AttributeHandler) {
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(device_id.to_string())
            .or_default()
            .push((key, handler));
    }

    /// Delivers `change` to every matching handler and returns how many ran.
    ///
    /// Handlers are invoked outside the lock, so a handler may register more handlers.
    pub fn dispatch(&self, change: &AttributeChange) -> usize {
        let matching: Vec<AttributeHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&change.device.device_id)
            .map(|regs| {
                regs.iter()
                    .filter(|(key, _)| key.matches(&change.attribute))
                    .map(|(_, handler)| Arc::clone(handler))
                    .collect()
            })
            .unwrap_or_default();

        for handler in &matching {
            handler(change);
        }
        matching.len()
    }

    /// Total number of registrations across all devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of registrations for one device.
    #[must_use]
    pub fn count_for(&self, device_id: &str) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(device_id)
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

/// Handle to a base station or camera.
#[derive(Clone)]
pub struct Device {
    info: DeviceInfo,
    registry: Arc<CallbackRegistry>,
}

impl Device {
    /// Creates a handle whose callbacks are stored in `registry`.
    #[must_use]
    pub const fn new(info: DeviceInfo, registry: Arc<CallbackRegistry>) -> Self {
        Self { info, registry }
    }

    /// User-visible name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Unique identifier.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.info.device_id
    }

    /// State at enumeration time.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.info.state
    }

    /// Base station or camera.
    #[must_use]
    pub const fn kind(&self) -> DeviceKind {
        self.info.kind
    }

    /// Full device information.
    #[must_use]
    pub const fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Registers a handler for changes of `key` on this device.
    pub fn add_attr_callback(&self, key: AttributeKey, handler: AttributeHandler) {
        self.registry.register(&self.info.device_id, key, handler);
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device").field("info", &self.info).finish()
    }
}
