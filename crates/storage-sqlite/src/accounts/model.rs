//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::accounts::{Account, AccountClassification, NewAccount};

use crate::utils::parse_decimal;

/// Database model for accounts
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub family_id: String,
    pub linked_item_id: Option<String>,
    pub external_id: Option<String>,
    pub name: String,
    pub account_type: String,
    pub subtype: Option<String>,
    pub classification: String,
    pub currency: String,
    pub balance: String,
    pub cash_balance: String,
    pub is_active: bool,
    pub meta: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            balance: parse_decimal(&db.balance, "balance"),
            cash_balance: parse_decimal(&db.cash_balance, "cash_balance"),
            classification: AccountClassification::parse(&db.classification),
            id: db.id,
            family_id: db.family_id,
            linked_item_id: db.linked_item_id,
            external_id: db.external_id,
            name: db.name,
            account_type: db.account_type,
            subtype: db.subtype,
            currency: db.currency,
            is_active: db.is_active,
            meta: db.meta,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let balance = domain.balance.to_string();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            family_id: domain.family_id,
            linked_item_id: domain.linked_item_id,
            external_id: domain.external_id,
            name: domain.name,
            account_type: domain.account_type,
            subtype: domain.subtype,
            classification: domain.classification.as_str().to_string(),
            currency: domain.currency,
            cash_balance: balance.clone(),
            balance,
            is_active: domain.is_active,
            meta: domain.meta,
            created_at: now,
            updated_at: now,
        }
    }
}
