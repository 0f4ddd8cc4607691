use warden_core::{SecurityEvent, SecurityEventSink};

/// Emits security events as structured tracing records; the default sink when
/// no SIEM queue is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl SecurityEventSink for TracingEventSink {
    fn emit(&self, event: SecurityEvent) {
        match serde_json::to_string(&event) {
            Ok(body) => {
                tracing::info!(target: "warden::events", event = event.name(), %body, "security event");
            }
            Err(error) => {
                tracing::warn!(target: "warden::events", event = event.name(), %error, "unserializable security event");
            }
        }
    }
}
