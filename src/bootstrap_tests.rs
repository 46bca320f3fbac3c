//! Tests for the bootstrap sequence.

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::json;

use super::*;
use crate::client::{CallbackRegistry, DeviceInfo};

/// How the fake event pump behaves.
#[derive(Debug, Clone, Copy)]
enum Pump {
    Forever,
    Fails,
}

struct FakeService {
    connected: bool,
    last_error: Option<String>,
    base_stations: Vec<Device>,
    cameras: Vec<Device>,
    registry: Arc<CallbackRegistry>,
    pump: Pump,
}

impl FakeService {
    fn connected(bases: usize, cameras: usize) -> Self {
        let registry = Arc::new(CallbackRegistry::new());
        let device = |kind, prefix: &str, i: usize| {
            Device::new(
                DeviceInfo::new(format!("{prefix} {i}"), format!("{prefix}-{i}"), kind, "provisioned"),
                Arc::clone(&registry),
            )
        };
        let base_stations = (0..bases).map(|i| device(DeviceKind::BaseStation, "base", i)).collect();
        let cameras = (0..cameras).map(|i| device(DeviceKind::Camera, "cam", i)).collect();

        Self {
            connected: true,
            last_error: None,
            base_stations,
            cameras,
            registry,
            pump: Pump::Forever,
        }
    }

    fn disconnected(reason: Option<&str>) -> Self {
        Self {
            connected: false,
            last_error: reason.map(ToString::to_string),
            ..Self::connected(1, 1)
        }
    }
}

impl CameraService for FakeService {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn base_stations(&self) -> &[Device] {
        &self.base_stations
    }

    fn cameras(&self) -> &[Device] {
        &self.cameras
    }

    async fn run_events(&self) -> Result<(), ApiError> {
        match self.pump {
            Pump::Forever => std::future::pending().await,
            Pump::Fails => Err(ApiError::NotConnected),
        }
    }
}

fn change(name: &str, attribute: &str, value: serde_json::Value) -> AttributeChange {
    AttributeChange::new(
        DeviceInfo::new(name, "id-1", DeviceKind::Camera, "provisioned"),
        attribute,
        value,
    )
}

mod attach {
    use super::*;

    #[test]
    fn not_connected_fails_without_touching_devices() {
        let service = FakeService::disconnected(Some("Request rejected: bad password"));

        let err = attach(&service).unwrap_err();

        assert!(matches!(err, BootstrapError::LoginFailed { ref reason } if reason.contains("bad password")));
        assert_eq!(err.to_string(), "failed to login(Request rejected: bad password)");
        assert!(service.registry.is_empty());
    }

    #[test]
    fn not_connected_without_reason() {
        let service = FakeService::disconnected(None);
        let err = attach(&service).unwrap_err();
        assert_eq!(err.to_string(), "failed to login(unknown error)");
    }

    #[test]
    fn registers_one_wildcard_handler_per_device() {
        let service = FakeService::connected(2, 3);

        let summaries = attach(&service).unwrap();

        assert_eq!(summaries.len(), 5);
        assert_eq!(service.registry.len(), 5);
        for device in service.base_stations.iter().chain(&service.cameras) {
            assert_eq!(service.registry.count_for(device.device_id()), 1);
        }
    }

    #[test]
    fn base_stations_are_listed_before_cameras() {
        let service = FakeService::connected(1, 2);

        let kinds: Vec<DeviceKind> = attach(&service).unwrap().iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![DeviceKind::BaseStation, DeviceKind::Camera, DeviceKind::Camera]
        );
    }

    #[test]
    fn empty_account_attaches_nothing() {
        let service = FakeService::connected(0, 0);
        assert!(attach(&service).unwrap().is_empty());
        assert!(service.registry.is_empty());
    }

    #[test]
    fn registered_handler_accepts_any_attribute() {
        let service = FakeService::connected(0, 1);
        attach(&service).unwrap();

        let info = service.cameras[0].info().clone();
        let ran = service
            .registry
            .dispatch(&AttributeChange::new(info, "anything", json!("x".repeat(500))));

        assert_eq!(ran, 1);
    }

    #[test]
    fn summary_copies_device_identity() {
        let service = FakeService::connected(1, 0);

        let summaries = attach(&service).unwrap();

        assert_eq!(
            summaries[0],
            DeviceSummary {
                kind: DeviceKind::BaseStation,
                name: "base 0".to_string(),
                device_id: "base-0".to_string(),
                state: "provisioned".to_string(),
            }
        );
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(ToString::to_string)
            .collect()
    }
}

/// Runs `f` with INFO-level logs captured, returning its result and the lines.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    (out, buffer.lines())
}

fn device_lines(lines: &[String]) -> Vec<&String> {
    lines
        .iter()
        .filter(|l| l.contains(" name=") && l.contains(",device_id=") && l.contains(",state="))
        .collect()
}

mod logging {
    use super::*;

    #[test]
    fn one_line_per_device_is_logged() {
        let service = FakeService::connected(2, 3);

        let (result, lines) = capture_logs(|| attach(&service));

        assert!(result.is_ok());
        let found = device_lines(&lines);
        assert_eq!(found.len(), 5, "{lines:#?}");
        assert_eq!(found.iter().filter(|l| l.contains("base: name=base ")).count(), 2);
        assert_eq!(found.iter().filter(|l| l.contains("camera: name=cam ")).count(), 3);
        assert!(found.iter().any(|l| l.ends_with("base: name=base 1,device_id=base-1,state=provisioned")));
        assert!(found.iter().any(|l| l.ends_with("camera: name=cam 2,device_id=cam-2,state=provisioned")));
    }

    #[test]
    fn nothing_is_logged_per_device_when_not_connected() {
        let service = FakeService::disconnected(Some("boom"));

        let (result, lines) = capture_logs(|| attach(&service));

        assert!(result.is_err());
        assert!(device_lines(&lines).is_empty(), "{lines:#?}");
    }

    #[test]
    fn attribute_change_is_logged_by_registered_handler() {
        let service = FakeService::connected(0, 1);

        let ((), lines) = capture_logs(|| {
            attach(&service).unwrap();
            let info = service.cameras[0].info().clone();
            service
                .registry
                .dispatch(&AttributeChange::new(info, "motionDetected", json!(true)));
        });

        assert!(lines.iter().any(|l| l.ends_with("attribute_changed:cam 0:motionDetected:true")), "{lines:#?}");
    }
}

mod formatting {
    use super::*;

    #[test]
    fn describe_device_lines() {
        let service = FakeService::connected(1, 1);
        assert_eq!(
            describe_device(&service.base_stations[0]),
            "base: name=base 0,device_id=base-0,state=provisioned"
        );
        assert_eq!(
            describe_device(&service.cameras[0]),
            "camera: name=cam 0,device_id=cam-0,state=provisioned"
        );
    }

    #[test]
    fn short_value_is_kept_whole() {
        assert_eq!(
            format_attribute_change(&change("Porch", "motionDetected", json!(true))),
            "attribute_changed:Porch:motionDetected:true"
        );
        assert_eq!(
            format_attribute_change(&change("Porch", "activityState", json!("idle"))),
            "attribute_changed:Porch:activityState:idle"
        );
    }

    #[test]
    fn long_value_is_truncated_to_exactly_80_characters() {
        let line = format_attribute_change(&change("Porch", "lastImage", json!("a".repeat(200))));

        let value = line.strip_prefix("attribute_changed:Porch:lastImage:").unwrap();
        assert_eq!(value, "a".repeat(80));
    }

    #[test]
    fn value_of_exactly_80_characters_is_untouched() {
        let line = format_attribute_change(&change("P", "x", json!("b".repeat(80))));
        assert!(line.ends_with(&"b".repeat(80)));
        assert_eq!(line.len(), "attribute_changed:P:x:".len() + 80);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let line = format_attribute_change(&change("P", "x", json!("é".repeat(100))));

        let value = line.strip_prefix("attribute_changed:P:x:").unwrap();
        assert_eq!(value.chars().count(), 80);
    }

    #[test]
    fn removed_attribute_renders_null() {
        assert_eq!(
            format_attribute_change(&change("P", "gone", serde_json::Value::Null)),
            "attribute_changed:P:gone:null"
        );
    }
}

mod run_until {
    use super::*;

    #[tokio::test]
    async fn shutdown_returns_ok() {
        let service = FakeService::connected(1, 1);
        assert!(super::super::run_until(&service, async {}).await.is_ok());
    }

    #[tokio::test]
    async fn pump_error_is_returned() {
        let mut service = FakeService::connected(1, 1);
        service.pump = Pump::Fails;

        let err = super::super::run_until(&service, std::future::pending())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::NotConnected));
    }
}
