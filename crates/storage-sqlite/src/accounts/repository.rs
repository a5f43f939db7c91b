use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;

use ledgersync_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use ledgersync_core::errors::{Error, Result};

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::accounts;

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn ensure_updated(affected: usize, account_id: String) -> Result<()> {
    if affected == 0 {
        return Err(Error::not_found("Account", account_id));
    }
    Ok(())
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let account_db: AccountDB = new_account.into();
                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(account_db.into())
            })
            .await
    }

    async fn upsert_linked(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let incoming: AccountDB = new_account.into();

                let existing = accounts::table
                    .filter(accounts::linked_item_id.eq(&incoming.linked_item_id))
                    .filter(accounts::external_id.eq(&incoming.external_id))
                    .select(AccountDB::as_select())
                    .first::<AccountDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;

                let Some(mut account_db) = existing else {
                    diesel::insert_into(accounts::table)
                        .values(&incoming)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                    return Ok(incoming.into());
                };

                // Provider-owned fields only; activation and meta belong to the user.
                account_db.name = incoming.name;
                account_db.account_type = incoming.account_type;
                account_db.subtype = incoming.subtype;
                account_db.classification = incoming.classification;
                account_db.currency = incoming.currency;
                account_db.balance = incoming.balance;
                account_db.updated_at = Utc::now().naive_utc();

                diesel::update(accounts::table.find(&account_db.id))
                    .set(&account_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(account_db.into())
            })
            .await
    }

    async fn update_balances(
        &self,
        account_id: &str,
        balance: Decimal,
        cash_balance: Decimal,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::balance.eq(balance.to_string()),
                        accounts::cash_balance.eq(cash_balance.to_string()),
                        accounts::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, account_id)
            })
            .await
    }

    async fn update_meta(&self, account_id: &str, meta: String) -> Result<()> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::meta.eq(Some(meta)),
                        accounts::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, account_id)
            })
            .await
    }

    async fn set_active(&self, account_id: &str, is_active: bool) -> Result<()> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::is_active.eq(is_active),
                        accounts::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                ensure_updated(affected, account_id)
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        accounts::table
            .find(account_id)
            .select(AccountDB::as_select())
            .first::<AccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Account::from)
            .ok_or_else(|| Error::not_found("Account", account_id))
    }

    fn list_for_family(
        &self,
        family_id: &str,
        is_active_filter: Option<bool>,
    ) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table
            .filter(accounts::family_id.eq(family_id))
            .into_boxed();

        if let Some(active) = is_active_filter {
            query = query.filter(accounts::is_active.eq(active));
        }

        let rows = query
            .select(AccountDB::as_select())
            .order((accounts::is_active.desc(), accounts::name.asc()))
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    fn list_for_item(&self, linked_item_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = accounts::table
            .filter(accounts::linked_item_id.eq(linked_item_id))
            .select(AccountDB::as_select())
            .order(accounts::name.asc())
            .load::<AccountDB>(&mut conn)
            .into_core()?;

        Ok(rows.into_iter().map(Account::from).collect())
    }
}
