//! Sync record persistence and work submission contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::sync_model::{NewSyncRecord, SyncRecord, SyncStatus, SyncTarget};
use crate::errors::Result;

#[async_trait]
pub trait SyncRecordRepositoryTrait: Send + Sync {
    /// Inserts a record in `pending` state.
    async fn create(&self, new_record: NewSyncRecord) -> Result<SyncRecord>;

    /// Stores a new status, and the failure message when failing.
    async fn update_status(
        &self,
        record_id: &str,
        status: SyncStatus,
        error: Option<String>,
    ) -> Result<SyncRecord>;

    fn get_by_id(&self, record_id: &str) -> Result<SyncRecord>;

    /// Newest pending or syncing record for the target created at or after `since`.
    fn find_active_for_target(
        &self,
        target: &SyncTarget,
        since: DateTime<Utc>,
    ) -> Result<Option<SyncRecord>>;

    /// Counts pending or syncing records for any of the targets created at or after `since`.
    fn count_active_since(&self, targets: &[SyncTarget], since: DateTime<Utc>) -> Result<usize>;
}

/// Hands a created record to the worker pool. Must not block on execution.
pub trait SyncQueue: Send + Sync {
    fn submit(&self, record_id: &str) -> Result<()>;
}

/// Per-target sync behaviour driven by the runner.
#[async_trait]
pub trait SyncHandler: Send + Sync {
    /// Refreshes the target's data. An error fails the record.
    async fn sync_data(&self, record: &SyncRecord) -> Result<()>;

    /// Runs only after `sync_data` succeeded and the record is completed.
    async fn post_sync(&self, record: &SyncRecord) -> Result<()>;
}
