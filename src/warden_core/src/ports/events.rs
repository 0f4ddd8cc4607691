use crate::domain::event::SecurityEvent;

/// Outbound event queue drained by the SIEM collaborator. Implementations must
/// not block the caller; per-identifier ordering follows emit order.
pub trait SecurityEventSink: Send + Sync {
    fn emit(&self, event: SecurityEvent);
}

/// Drops every event, for embedders without a SIEM tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl SecurityEventSink for NoopEventSink {
    fn emit(&self, _event: SecurityEvent) {}
}
