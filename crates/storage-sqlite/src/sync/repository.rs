use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use ledgersync_core::errors::{Error, Result};
use ledgersync_core::sync::{
    NewSyncRecord, SyncRecord, SyncRecordRepositoryTrait, SyncStatus, SyncTarget,
};

use super::model::SyncRecordDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::sync_records;
use crate::utils::{chunk_for_sqlite, format_timestamp};

const ACTIVE_STATUSES: [&str; 2] = ["pending", "syncing"];

pub struct SyncRecordRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncRecordRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_record(conn: &mut SqliteConnection, record_id: &str) -> Result<SyncRecord> {
    sync_records::table
        .find(record_id)
        .select(SyncRecordDB::as_select())
        .first::<SyncRecordDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::not_found("SyncRecord", record_id))?
        .try_into()
}

#[async_trait]
impl SyncRecordRepositoryTrait for SyncRecordRepository {
    async fn create(&self, new_record: NewSyncRecord) -> Result<SyncRecord> {
        self.writer
            .exec(move |conn| {
                let record_db: SyncRecordDB = new_record.into();
                diesel::insert_into(sync_records::table)
                    .values(&record_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                record_db.try_into()
            })
            .await
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: SyncStatus,
        error: Option<String>,
    ) -> Result<SyncRecord> {
        let record_id = record_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(sync_records::table.find(&record_id))
                    .set((
                        sync_records::status.eq(status.as_str()),
                        sync_records::error.eq(error),
                        sync_records::updated_at.eq(format_timestamp(Utc::now())),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found("SyncRecord", record_id));
                }
                load_record(conn, &record_id)
            })
            .await
    }

    fn get_by_id(&self, record_id: &str) -> Result<SyncRecord> {
        let mut conn = get_connection(&self.pool)?;
        load_record(&mut conn, record_id)
    }

    fn find_active_for_target(
        &self,
        target: &SyncTarget,
        since: DateTime<Utc>,
    ) -> Result<Option<SyncRecord>> {
        let mut conn = get_connection(&self.pool)?;

        sync_records::table
            .filter(sync_records::target_kind.eq(target.kind()))
            .filter(sync_records::target_id.eq(target.id()))
            .filter(sync_records::status.eq_any(ACTIVE_STATUSES))
            .filter(sync_records::created_at.ge(format_timestamp(since)))
            .order(sync_records::created_at.desc())
            .select(SyncRecordDB::as_select())
            .first::<SyncRecordDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(SyncRecord::try_from)
            .transpose()
    }

    fn count_active_since(&self, targets: &[SyncTarget], since: DateTime<Utc>) -> Result<usize> {
        if targets.is_empty() {
            return Ok(0);
        }
        let mut conn = get_connection(&self.pool)?;

        let wanted: HashSet<(&str, &str)> = targets.iter().map(|t| (t.kind(), t.id())).collect();
        let ids: Vec<&str> = wanted
            .iter()
            .map(|(_, id)| *id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let since = format_timestamp(since);

        let mut count = 0;
        for chunk in chunk_for_sqlite(&ids) {
            let rows: Vec<(String, String)> = sync_records::table
                .filter(sync_records::target_id.eq_any(chunk))
                .filter(sync_records::status.eq_any(ACTIVE_STATUSES))
                .filter(sync_records::created_at.ge(&since))
                .select((sync_records::target_kind, sync_records::target_id))
                .load(&mut conn)
                .map_err(StorageError::from)?;
            count += rows
                .iter()
                .filter(|(kind, id)| wanted.contains(&(kind.as_str(), id.as_str())))
                .count();
        }
        Ok(count)
    }
}
