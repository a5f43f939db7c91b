//! Database model for sync records.

use chrono::Utc;
use diesel::prelude::*;

use ledgersync_core::errors::Error;
use ledgersync_core::sync::{NewSyncRecord, SyncRecord, SyncStatus, SyncTarget, SyncWindow};

use crate::utils::{format_date, format_timestamp, parse_date, parse_timestamp};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncRecordDB {
    pub id: String,
    pub target_kind: String,
    pub target_id: String,
    pub status: String,
    pub parent_id: Option<String>,
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<SyncRecordDB> for SyncRecord {
    type Error = Error;

    fn try_from(db: SyncRecordDB) -> Result<Self, Self::Error> {
        Ok(Self {
            target: SyncTarget::from_parts(&db.target_kind, db.target_id)?,
            status: SyncStatus::parse(&db.status)?,
            window: SyncWindow::new(
                db.window_start.map(|d| parse_date(&d, "window_start")),
                db.window_end.map(|d| parse_date(&d, "window_end")),
            ),
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
            id: db.id,
            parent_id: db.parent_id,
            error: db.error,
        })
    }
}

impl From<NewSyncRecord> for SyncRecordDB {
    fn from(domain: NewSyncRecord) -> Self {
        let now = format_timestamp(Utc::now());
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            target_kind: domain.target.kind().to_string(),
            target_id: domain.target.id().to_string(),
            status: SyncStatus::Pending.as_str().to_string(),
            parent_id: domain.parent_id,
            window_start: domain.window.start_date.map(format_date),
            window_end: domain.window.end_date.map(format_date),
            error: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
