//! QR-scan tracker
//!
//! Wires a single handler for scan events onto the event bus and forwards
//! each scan to the recorder. Registration is internally idempotent: calling
//! `setup` twice leaves exactly one handler, so a dispatched scan is logged
//! once, never twice.

use crate::sink::ScanRecorder;
use givetrace_bus::EventBus;
use givetrace_core::ScanEvent;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Topic carrying QR-scan events. Any producer dispatching this topic on
/// the bus is a valid source; payload shape is
/// `{"data": <opaque>, "user": <opaque?>}`.
pub const QR_CODE_SCANNED: &str = "qr-code-scanned";

/// Registration key guarding against double setup.
const TRACKER_KEY: &str = "scan-tracker";

/// Forwards scan events from the bus to the scan recorder.
///
/// The tracker (and the handler it registers) holds only a weak reference
/// to the recorder: the host keeps sole ownership and can consume it for
/// `ScanRecorder::shutdown()` while the bus and its handlers stay alive.
/// Scans dispatched after shutdown are dropped.
pub struct ScanTracker {
    recorder: Weak<ScanRecorder>,
}

impl ScanTracker {
    pub fn new(recorder: &Arc<ScanRecorder>) -> Self {
        Self {
            recorder: Arc::downgrade(recorder),
        }
    }

    /// Register the scan handler on the bus. Safe to call more than once:
    /// only the first call registers. Returns whether this call did.
    pub fn setup(&self, bus: &EventBus) -> bool {
        let recorder = Weak::clone(&self.recorder);
        let registered = bus.subscribe_once(QR_CODE_SCANNED, TRACKER_KEY, move |payload| {
            Self::on_scan(&recorder, payload);
        });

        if registered {
            tracing::info!(topic = QR_CODE_SCANNED, "QR scan tracking initialized");
        }

        registered
    }

    /// Handle one scan payload. Payloads without `data` are dropped
    /// silently: no error, no diagnostic. Anything else is forwarded as-is;
    /// validating the payload is the sink's concern.
    fn on_scan(recorder: &Weak<ScanRecorder>, payload: &Value) {
        let Some(data) = payload.get("data") else {
            return;
        };
        if data.is_null() {
            return;
        }

        let Some(recorder) = recorder.upgrade() else {
            tracing::debug!("Scan recorder already shut down, dropping scan");
            return;
        };

        let user = payload.get("user").and_then(user_from_value);
        let _ = recorder.record(ScanEvent::new(data.clone(), user));
    }
}

/// Coerce the payload's `user` field to an identity string. Non-string JSON
/// values keep their JSON rendering rather than being dropped.
fn user_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
