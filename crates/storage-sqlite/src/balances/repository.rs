use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use ledgersync_core::balances::{BalanceRepositoryTrait, DailyBalance};
use ledgersync_core::errors::Result;

use super::model::AccountBalanceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::account_balances;

pub struct BalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BalanceRepositoryTrait for BalanceRepository {
    async fn upsert_balances(&self, balances: Vec<DailyBalance>) -> Result<usize> {
        if balances.is_empty() {
            return Ok(0);
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for balance in balances {
                    let balance_db: AccountBalanceDB = balance.into();
                    affected_rows += diesel::insert_into(account_balances::table)
                        .values(&balance_db)
                        .on_conflict((account_balances::account_id, account_balances::date))
                        .do_update()
                        .set((
                            account_balances::balance.eq(&balance_db.balance),
                            account_balances::cash_balance.eq(&balance_db.cash_balance),
                            account_balances::currency.eq(&balance_db.currency),
                            account_balances::updated_at.eq(balance_db.updated_at),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }

    fn list_balances(&self, account_id: &str) -> Result<Vec<DailyBalance>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = account_balances::table
            .filter(account_balances::account_id.eq(account_id))
            .select(AccountBalanceDB::as_select())
            .order(account_balances::date.asc())
            .load::<AccountBalanceDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(DailyBalance::from).collect())
    }
}
