//! Attribute change detection between device listings.

use std::collections::{BTreeMap, HashMap};

use super::device::{AttributeChange, DeviceInfo};

/// Point-in-time attribute values of one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSnapshot {
    /// Device identity and state
    pub info: DeviceInfo,
    /// Top-level attributes as reported by the service
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl DeviceSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(info: DeviceInfo, attributes: BTreeMap<String, serde_json::Value>) -> Self {
        Self { info, attributes }
    }
}

/// Computes attribute changes between two listings.
///
/// Only devices present in both listings are compared. For each such
/// device, every attribute whose value differs (or that is new) yields a
/// change carrying the new value; attributes that disappeared yield a
/// change with [`serde_json::Value::Null`].
///
/// Changes are ordered by device position in `new`, then by attribute name.
/// The event's [`DeviceInfo`] is taken from `new`.
#[must_use]
pub fn diff(old: &[DeviceSnapshot], new: &[DeviceSnapshot]) -> Vec<AttributeChange> {
    let old_by_id: HashMap<&str, &DeviceSnapshot> = old
        .iter()
        .map(|d| (d.info.device_id.as_str(), d))
        .collect();

    let mut changes = Vec::new();

    for current in new {
        let Some(previous) = old_by_id.get(current.info.device_id.as_str()) else {
            continue;
        };
        diff_attributes(&mut changes, previous, current);
    }

    changes
}

fn diff_attributes(
    changes: &mut Vec<AttributeChange>,
    previous: &DeviceSnapshot,
    current: &DeviceSnapshot,
) {
    for (name, value) in &current.attributes {
        if previous.attributes.get(name) != Some(value) {
            changes.push(AttributeChange::new(
                current.info.clone(),
                name.clone(),
                value.clone(),
            ));
        }
    }

    for name in previous.attributes.keys() {
        if !current.attributes.contains_key(name) {
            changes.push(AttributeChange::new(
                current.info.clone(),
                name.clone(),
                serde_json::Value::Null,
            ));
        }
    }
}
