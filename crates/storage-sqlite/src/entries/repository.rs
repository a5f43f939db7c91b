use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use ledgersync_core::entries::{Entry, EntryRepositoryTrait, NewEntry, UpsertSummary};
use ledgersync_core::errors::{Error, Result};

use super::model::EntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::entries;
use crate::utils::chunk_for_sqlite;

pub struct EntryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    async fn create(&self, new_entry: NewEntry) -> Result<Entry> {
        new_entry.validate()?;

        self.writer
            .exec(move |conn| {
                let entry_db = EntryDB::from_new(new_entry)?;
                diesel::insert_into(entries::table)
                    .values(&entry_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(entry_db.into())
            })
            .await
    }

    async fn upsert_entries(&self, new_entries: Vec<NewEntry>) -> Result<UpsertSummary> {
        for entry in &new_entries {
            entry.validate()?;
        }
        if new_entries.is_empty() {
            return Ok(UpsertSummary::default());
        }

        self.writer
            .exec(move |conn| {
                let mut summary = UpsertSummary::default();

                for new_entry in new_entries {
                    let mut entry_db = EntryDB::from_new(new_entry)?;

                    let existing = match &entry_db.external_id {
                        Some(external_id) => entries::table
                            .filter(entries::account_id.eq(&entry_db.account_id))
                            .filter(entries::external_id.eq(external_id))
                            .select(EntryDB::as_select())
                            .first::<EntryDB>(conn)
                            .optional()
                            .map_err(StorageError::from)?,
                        None => None,
                    };

                    match existing {
                        Some(current) => {
                            entry_db.id = current.id;
                            entry_db.created_at = current.created_at;
                            entry_db.updated_at = Utc::now().naive_utc();
                            diesel::update(entries::table.find(&entry_db.id))
                                .set(&entry_db)
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            summary.updated += 1;
                        }
                        None => {
                            diesel::insert_into(entries::table)
                                .values(&entry_db)
                                .execute(conn)
                                .map_err(StorageError::from)?;
                            summary.inserted += 1;
                        }
                    }
                }

                Ok(summary)
            })
            .await
    }

    async fn delete_by_external_ids(
        &self,
        account_ids: Vec<String>,
        external_ids: Vec<String>,
    ) -> Result<usize> {
        if account_ids.is_empty() || external_ids.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn| {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&external_ids) {
                    deleted += diesel::delete(
                        entries::table
                            .filter(entries::account_id.eq_any(&account_ids))
                            .filter(entries::external_id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }

    fn get_by_id(&self, entry_id: &str) -> Result<Entry> {
        let mut conn = get_connection(&self.pool)?;

        entries::table
            .find(entry_id)
            .select(EntryDB::as_select())
            .first::<EntryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Entry::from)
            .ok_or_else(|| Error::not_found("Entry", entry_id))
    }

    fn list_for_account(&self, account_id: &str) -> Result<Vec<Entry>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = entries::table
            .filter(entries::account_id.eq(account_id))
            .select(EntryDB::as_select())
            .order((entries::date.asc(), entries::created_at.asc()))
            .load::<EntryDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Entry::from).collect())
    }
}
