use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use ledgersync_core::entries::UpsertSummary;
use ledgersync_core::errors::Result;
use ledgersync_core::investments::{
    Holding, InvestmentRepositoryTrait, NewHolding, NewSecurity, Security,
};

use super::model::{HoldingDB, SecurityDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{holdings, securities};

pub struct InvestmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl InvestmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InvestmentRepository {
    async fn upsert_securities(&self, new_securities: Vec<NewSecurity>) -> Result<Vec<Security>> {
        if new_securities.is_empty() {
            return Ok(Vec::new());
        }

        self.writer
            .exec(move |conn| {
                let mut seen = HashSet::new();
                let mut result = Vec::new();

                for new_security in new_securities {
                    if !seen.insert(new_security.provider_security_id.clone()) {
                        continue;
                    }
                    let key = new_security.provider_security_id.clone();
                    let security_db: SecurityDB = new_security.into();

                    // Find-or-create: an existing row keeps its id and metadata.
                    diesel::insert_into(securities::table)
                        .values(&security_db)
                        .on_conflict(securities::provider_security_id)
                        .do_nothing()
                        .execute(conn)
                        .map_err(StorageError::from)?;

                    let stored = securities::table
                        .filter(securities::provider_security_id.eq(&key))
                        .select(SecurityDB::as_select())
                        .first::<SecurityDB>(conn)
                        .map_err(StorageError::from)?;
                    result.push(stored.into());
                }

                Ok(result)
            })
            .await
    }

    async fn upsert_holdings(&self, new_holdings: Vec<NewHolding>) -> Result<UpsertSummary> {
        if new_holdings.is_empty() {
            return Ok(UpsertSummary::default());
        }

        self.writer
            .exec(move |conn| {
                let mut summary = UpsertSummary::default();

                for new_holding in new_holdings {
                    let mut holding_db: HoldingDB = new_holding.into();

                    let existing = holdings::table
                        .filter(holdings::account_id.eq(&holding_db.account_id))
                        .filter(holdings::security_id.eq(&holding_db.security_id))
                        .filter(holdings::date.eq(&holding_db.date))
                        .select(HoldingDB::as_select())
                        .first::<HoldingDB>(conn)
                        .optional()
                        .map_err(StorageError::from)?;

                    if let Some(current) = existing {
                        holding_db.id = current.id;
                        holding_db.created_at = current.created_at;
                        holding_db.updated_at = Utc::now().naive_utc();
                        diesel::update(holdings::table.find(&holding_db.id))
                            .set(&holding_db)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        summary.updated += 1;
                    } else {
                        diesel::insert_into(holdings::table)
                            .values(&holding_db)
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        summary.inserted += 1;
                    }
                }

                Ok(summary)
            })
            .await
    }

    fn list_holdings(&self, account_id: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = holdings::table
            .filter(holdings::account_id.eq(account_id))
            .select(HoldingDB::as_select())
            .order((holdings::date.asc(), holdings::security_id.asc()))
            .load::<HoldingDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Holding::from).collect())
    }
}
