use std::sync::Arc;

use log::{debug, info};

use super::transfers_model::{RejectedPair, Transfer, TransferMatchConfig, TransferStatus};
use super::transfers_traits::TransferRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};

pub struct TransferService {
    repository: Arc<dyn TransferRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    config: TransferMatchConfig,
}

impl TransferService {
    pub fn new(
        repository: Arc<dyn TransferRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            event_sink,
            config: TransferMatchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TransferMatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Links every qualifying pair in the family. Re-running is a no-op once
    /// no unlinked candidates remain.
    pub async fn auto_match_transfers(&self, family_id: &str) -> Result<Vec<Transfer>> {
        let created = self
            .repository
            .auto_match(family_id, self.config.clone())
            .await?;

        if created.is_empty() {
            debug!("No new transfers matched for family {}", family_id);
        } else {
            info!(
                "Matched {} new transfers for family {}",
                created.len(),
                family_id
            );
            self.event_sink.emit(DomainEvent::transfers_matched(
                family_id.to_string(),
                created.iter().map(|t| t.id.clone()).collect(),
            ));
        }
        Ok(created)
    }

    pub async fn confirm(&self, transfer_id: &str) -> Result<Transfer> {
        let transfer = self.repository.get_by_id(transfer_id)?;
        if transfer.status == TransferStatus::Confirmed {
            return Ok(transfer);
        }
        self.repository.confirm(transfer_id).await
    }

    /// Rejects an unconfirmed link. Confirmed links stay in place.
    pub async fn reject(&self, transfer_id: &str) -> Result<RejectedPair> {
        let transfer = self.repository.get_by_id(transfer_id)?;
        if transfer.status == TransferStatus::Confirmed {
            return Err(Error::InvalidStateTransition {
                from: TransferStatus::Confirmed.as_str().to_string(),
                to: "rejected".to_string(),
            });
        }
        self.repository.reject(transfer_id).await
    }

    pub fn list_for_family(&self, family_id: &str) -> Result<Vec<Transfer>> {
        self.repository.list_for_family(family_id)
    }
}
