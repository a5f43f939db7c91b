//! Executes one sync record through its target's handler.

use std::sync::Arc;

use log::{debug, error, info, warn};

use super::sync_model::{SyncRecord, SyncStatus, SyncTarget};
use super::sync_traits::{SyncHandler, SyncRecordRepositoryTrait};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};

/// One handler per target kind.
#[derive(Clone)]
pub struct SyncHandlers {
    pub family: Arc<dyn SyncHandler>,
    pub item: Arc<dyn SyncHandler>,
    pub account: Arc<dyn SyncHandler>,
}

impl SyncHandlers {
    fn for_target(&self, target: &SyncTarget) -> &Arc<dyn SyncHandler> {
        match target {
            SyncTarget::Family(_) => &self.family,
            SyncTarget::Item(_) => &self.item,
            SyncTarget::Account(_) => &self.account,
        }
    }
}

pub struct SyncRunner {
    sync_records: Arc<dyn SyncRecordRepositoryTrait>,
    handlers: SyncHandlers,
    event_sink: Arc<dyn DomainEventSink>,
}

impl SyncRunner {
    pub fn new(
        sync_records: Arc<dyn SyncRecordRepositoryTrait>,
        handlers: SyncHandlers,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            sync_records,
            handlers,
            event_sink,
        }
    }

    /// Runs a pending record to a terminal state and returns the stored result.
    ///
    /// A failing data hook is recorded on the record and does not surface as
    /// an `Err`; only bookkeeping failures (loading or updating the record) do.
    /// Records that are not pending are returned untouched.
    pub async fn execute(&self, record_id: &str) -> Result<SyncRecord> {
        let record = self.sync_records.get_by_id(record_id)?;
        if record.status != SyncStatus::Pending {
            warn!(
                "Skipping sync record {} for {}: status is {}",
                record.id, record.target, record.status
            );
            return Ok(record);
        }

        let record = self.transition(&record, SyncStatus::Syncing, None).await?;
        info!("Sync started for {} (record {})", record.target, record.id);

        let handler = self.handlers.for_target(&record.target);
        match handler.sync_data(&record).await {
            Ok(()) => {
                let completed = self
                    .transition(&record, SyncStatus::Completed, None)
                    .await?;
                info!("Sync completed for {} (record {})", completed.target, completed.id);
                self.event_sink.emit(DomainEvent::sync_completed(
                    completed.target.clone(),
                    completed.id.clone(),
                ));

                if let Err(e) = handler.post_sync(&completed).await {
                    warn!(
                        "Post-sync step failed for {} (record {}): {}",
                        completed.target, completed.id, e
                    );
                }
                Ok(completed)
            }
            Err(e) => {
                let message = e.to_string();
                error!(
                    "Sync failed for {} (record {}): {}",
                    record.target, record.id, message
                );
                let failed = self
                    .transition(&record, SyncStatus::Failed, Some(message.clone()))
                    .await?;
                self.event_sink.emit(DomainEvent::sync_failed(
                    failed.target.clone(),
                    failed.id.clone(),
                    message,
                ));
                Ok(failed)
            }
        }
    }

    async fn transition(
        &self,
        record: &SyncRecord,
        next: SyncStatus,
        error: Option<String>,
    ) -> Result<SyncRecord> {
        if !record.status.can_transition_to(next) {
            return Err(Error::InvalidStateTransition {
                from: record.status.to_string(),
                to: next.to_string(),
            });
        }
        debug!("Sync record {}: {} -> {}", record.id, record.status, next);
        self.sync_records
            .update_status(&record.id, next, error)
            .await
    }
}
