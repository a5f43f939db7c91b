use ledgersync_core::events::{DomainEvent, DomainEventSink};
use tracing::{info, warn};

/// Writes every domain event as one structured log line.
#[derive(Clone, Default)]
pub struct TracingDomainEventSink;

impl TracingDomainEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl DomainEventSink for TracingDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        match &event {
            DomainEvent::SyncFailed {
                target,
                record_id,
                error,
            } => warn!(target_entity = %target, record_id = %record_id, error = %error, "sync failed"),
            DomainEvent::LinkedItemRequiresUpdate { item_id } => {
                warn!(item_id = %item_id, "linked item requires reconnect")
            }
            _ => match serde_json::to_string(&event) {
                Ok(payload) => info!(event = %payload, "domain event"),
                Err(e) => warn!("Failed to serialize domain event: {}", e),
            },
        }
    }
}
