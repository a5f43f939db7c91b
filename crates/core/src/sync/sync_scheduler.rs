//! Creates sync records and hands them to the worker pool.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use super::sync_model::{NewSyncRecord, SyncConfig, SyncRecord, SyncTarget, SyncWindow};
use super::sync_traits::{SyncQueue, SyncRecordRepositoryTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::errors::Result;
use crate::families::FamilyRepositoryTrait;
use crate::items::LinkedItemRepositoryTrait;

pub struct SyncScheduler {
    sync_records: Arc<dyn SyncRecordRepositoryTrait>,
    families: Arc<dyn FamilyRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    items: Arc<dyn LinkedItemRepositoryTrait>,
    queue: Arc<dyn SyncQueue>,
    config: SyncConfig,
}

impl SyncScheduler {
    pub fn new(
        sync_records: Arc<dyn SyncRecordRepositoryTrait>,
        families: Arc<dyn FamilyRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        items: Arc<dyn LinkedItemRepositoryTrait>,
        queue: Arc<dyn SyncQueue>,
        config: SyncConfig,
    ) -> Self {
        Self {
            sync_records,
            families,
            accounts,
            items,
            queue,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Creates a pending record and submits it. Never waits for execution.
    pub async fn enqueue(
        &self,
        target: SyncTarget,
        window: SyncWindow,
        parent_id: Option<String>,
    ) -> Result<SyncRecord> {
        let record = self
            .sync_records
            .create(NewSyncRecord {
                target,
                parent_id,
                window,
            })
            .await?;
        self.queue.submit(&record.id)?;
        debug!("Enqueued sync record {} for {}", record.id, record.target);
        Ok(record)
    }

    /// Like [`enqueue`](Self::enqueue), but returns the target's existing
    /// active record instead of queuing a duplicate.
    ///
    /// The check is best-effort: two callers racing may both create a record,
    /// which is safe because imports converge.
    pub async fn sync_later(
        &self,
        target: SyncTarget,
        window: SyncWindow,
        parent_id: Option<String>,
    ) -> Result<SyncRecord> {
        let since = self.staleness_cutoff(Utc::now());
        if let Some(existing) = self.sync_records.find_active_for_target(&target, since)? {
            debug!(
                "Sync for {} already active as record {}; not enqueuing another",
                target, existing.id
            );
            return Ok(existing);
        }
        self.enqueue(target, window, parent_id).await
    }

    /// Enqueues one family sync per family. A failure for one family is
    /// logged and does not stop the others.
    pub async fn sync_all_families(&self) -> Result<Vec<SyncRecord>> {
        let families = self.families.list()?;
        let mut records = Vec::with_capacity(families.len());
        for family in families {
            match self
                .sync_later(SyncTarget::Family(family.id.clone()), SyncWindow::default(), None)
                .await
            {
                Ok(record) => records.push(record),
                Err(e) => error!("Failed to schedule sync for family {}: {}", family.id, e),
            }
        }
        info!("Scheduled {} family syncs", records.len());
        Ok(records)
    }

    /// True when the family, one of its accounts or one of its items has a
    /// non-stale pending or syncing record.
    pub fn is_family_syncing(&self, family_id: &str) -> Result<bool> {
        self.is_family_syncing_at(family_id, Utc::now())
    }

    pub fn is_family_syncing_at(&self, family_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let mut targets = vec![SyncTarget::Family(family_id.to_string())];
        targets.extend(
            self.accounts
                .list_for_family(family_id, None)?
                .into_iter()
                .map(|account| SyncTarget::Account(account.id)),
        );
        targets.extend(
            self.items
                .list_for_family(family_id)?
                .into_iter()
                .map(|item| SyncTarget::Item(item.id)),
        );

        let active = self
            .sync_records
            .count_active_since(&targets, self.staleness_cutoff(now))?;
        Ok(active > 0)
    }

    fn staleness_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.config.stale_after
    }
}
