use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::not;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use ledgersync_core::entries::EntryKind;
use ledgersync_core::errors::{Error, Result};
use ledgersync_core::transfers::{
    plan_transfer_matches, RejectedPair, Transfer, TransferCandidate, TransferMatchConfig,
    TransferRepositoryTrait, TransferStatus,
};

use super::model::{RejectedTransferDB, TransferDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{accounts, entries, rejected_transfers, transfers};
use crate::utils::{chunk_for_sqlite, parse_date, parse_decimal};

pub struct TransferRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransferRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_transfer(conn: &mut SqliteConnection, transfer_id: &str) -> Result<TransferDB> {
    transfers::table
        .find(transfer_id)
        .select(TransferDB::as_select())
        .first::<TransferDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::not_found("Transfer", transfer_id))
}

/// Transaction entries of the family's active accounts not yet in a transfer.
fn load_candidates(conn: &mut SqliteConnection, family_id: &str) -> Result<Vec<TransferCandidate>> {
    let rows: Vec<(String, String, String, String, String)> = entries::table
        .inner_join(accounts::table)
        .filter(accounts::family_id.eq(family_id))
        .filter(accounts::is_active.eq(true))
        .filter(entries::kind.eq(EntryKind::Transaction.as_str()))
        .filter(not(entries::id.eq_any(
            transfers::table.select(transfers::inflow_entry_id),
        )))
        .filter(not(entries::id.eq_any(
            transfers::table.select(transfers::outflow_entry_id),
        )))
        .select((
            entries::id,
            entries::account_id,
            entries::date,
            entries::amount,
            entries::currency,
        ))
        .load(conn)
        .map_err(StorageError::from)?;

    Ok(rows
        .into_iter()
        .map(|(entry_id, account_id, date, amount, currency)| TransferCandidate {
            date: parse_date(&date, "date"),
            amount: parse_decimal(&amount, "amount"),
            entry_id,
            account_id,
            currency,
            kind: EntryKind::Transaction,
        })
        .collect())
}

fn load_rejected(
    conn: &mut SqliteConnection,
    candidates: &[TransferCandidate],
) -> Result<HashSet<RejectedPair>> {
    let entry_ids: Vec<&str> = candidates.iter().map(|c| c.entry_id.as_str()).collect();
    let mut rejected = HashSet::new();
    for chunk in chunk_for_sqlite(&entry_ids) {
        let rows = rejected_transfers::table
            .filter(rejected_transfers::inflow_entry_id.eq_any(chunk))
            .select(RejectedTransferDB::as_select())
            .load::<RejectedTransferDB>(conn)
            .map_err(StorageError::from)?;
        rejected.extend(rows.into_iter().map(RejectedPair::from));
    }
    Ok(rejected)
}

#[async_trait]
impl TransferRepositoryTrait for TransferRepository {
    async fn auto_match(
        &self,
        family_id: &str,
        config: TransferMatchConfig,
    ) -> Result<Vec<Transfer>> {
        let family_id = family_id.to_string();

        // One writer job: no other write can link these entries between the
        // candidate scan and the inserts.
        self.writer
            .exec(move |conn| {
                let candidates = load_candidates(conn, &family_id)?;
                let rejected = load_rejected(conn, &candidates)?;
                let planned = plan_transfer_matches(&candidates, &rejected, &config);
                debug!(
                    "Family {}: {} transfer candidates, {} matches planned",
                    family_id,
                    candidates.len(),
                    planned.len()
                );

                let mut created = Vec::with_capacity(planned.len());
                for new_transfer in planned {
                    let transfer_db: TransferDB = new_transfer.into();
                    diesel::insert_into(transfers::table)
                        .values(&transfer_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    created.push(Transfer::from(transfer_db));
                }
                Ok(created)
            })
            .await
    }

    async fn confirm(&self, transfer_id: &str) -> Result<Transfer> {
        let transfer_id = transfer_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut transfer_db = load_transfer(conn, &transfer_id)?;
                transfer_db.status = TransferStatus::Confirmed.as_str().to_string();
                transfer_db.updated_at = Utc::now().naive_utc();

                diesel::update(transfers::table.find(&transfer_id))
                    .set((
                        transfers::status.eq(&transfer_db.status),
                        transfers::updated_at.eq(transfer_db.updated_at),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(transfer_db.into())
            })
            .await
    }

    async fn reject(&self, transfer_id: &str) -> Result<RejectedPair> {
        let transfer_id = transfer_id.to_string();
        self.writer
            .exec(move |conn| {
                let transfer_db = load_transfer(conn, &transfer_id)?;
                let pair = RejectedPair {
                    inflow_entry_id: transfer_db.inflow_entry_id,
                    outflow_entry_id: transfer_db.outflow_entry_id,
                };

                diesel::delete(transfers::table.find(&transfer_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::insert_into(rejected_transfers::table)
                    .values(RejectedTransferDB::from(pair.clone()))
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(pair)
            })
            .await
    }

    fn get_by_id(&self, transfer_id: &str) -> Result<Transfer> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_transfer(&mut conn, transfer_id)?.into())
    }

    fn list_for_family(&self, family_id: &str) -> Result<Vec<Transfer>> {
        let mut conn = get_connection(&self.pool)?;

        let family_entries = entries::table
            .inner_join(accounts::table)
            .filter(accounts::family_id.eq(family_id))
            .select(entries::id);

        let rows = transfers::table
            .filter(transfers::inflow_entry_id.eq_any(family_entries))
            .select(TransferDB::as_select())
            .order(transfers::created_at.asc())
            .load::<TransferDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Transfer::from).collect())
    }
}
