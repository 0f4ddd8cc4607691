use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use warden_core::{SecurityEvent, SecurityEventSink};

/// Queue-backed sink: components push, the SIEM collaborator drains the
/// receiver. A single queue keeps per-identifier ordering intact without
/// coupling the core to any pub/sub runtime.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: UnboundedSender<SecurityEvent>,
}

impl ChannelEventSink {
    pub fn unbounded() -> (Self, UnboundedReceiver<SecurityEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SecurityEventSink for ChannelEventSink {
    fn emit(&self, event: SecurityEvent) {
        // A dropped receiver just discards the event.
        let _ = self.tx.send(event);
    }
}
