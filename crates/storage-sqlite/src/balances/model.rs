use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::balances::DailyBalance;

use crate::utils::{format_date, parse_date, parse_decimal};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::account_balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountBalanceDB {
    pub id: String,
    pub account_id: String,
    pub date: String,
    pub balance: String,
    pub cash_balance: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountBalanceDB> for DailyBalance {
    fn from(db: AccountBalanceDB) -> Self {
        Self {
            date: parse_date(&db.date, "date"),
            balance: parse_decimal(&db.balance, "balance"),
            cash_balance: parse_decimal(&db.cash_balance, "cash_balance"),
            account_id: db.account_id,
            currency: db.currency,
        }
    }
}

impl From<DailyBalance> for AccountBalanceDB {
    fn from(domain: DailyBalance) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            account_id: domain.account_id,
            date: format_date(domain.date),
            balance: domain.balance.to_string(),
            cash_balance: domain.cash_balance.to_string(),
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        }
    }
}
