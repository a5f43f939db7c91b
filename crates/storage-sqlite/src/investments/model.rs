use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::investments::{Holding, NewHolding, NewSecurity, Security};

use crate::utils::{format_date, parse_date, parse_decimal};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::securities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SecurityDB {
    pub id: String,
    pub provider_security_id: String,
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub security_type: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SecurityDB> for Security {
    fn from(db: SecurityDB) -> Self {
        Self {
            id: db.id,
            provider_security_id: db.provider_security_id,
            ticker: db.ticker,
            name: db.name,
            currency: db.currency,
            security_type: db.security_type,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewSecurity> for SecurityDB {
    fn from(domain: NewSecurity) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            provider_security_id: domain.provider_security_id,
            ticker: domain.ticker,
            name: domain.name,
            currency: domain.currency,
            security_type: domain.security_type,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub account_id: String,
    pub security_id: String,
    pub date: String,
    pub quantity: String,
    pub price: String,
    pub amount: String,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<HoldingDB> for Holding {
    fn from(db: HoldingDB) -> Self {
        Self {
            date: parse_date(&db.date, "date"),
            quantity: parse_decimal(&db.quantity, "quantity"),
            price: parse_decimal(&db.price, "price"),
            amount: parse_decimal(&db.amount, "amount"),
            id: db.id,
            account_id: db.account_id,
            security_id: db.security_id,
            currency: db.currency,
        }
    }
}

impl From<NewHolding> for HoldingDB {
    fn from(domain: NewHolding) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            account_id: domain.account_id,
            security_id: domain.security_id,
            date: format_date(domain.date),
            quantity: domain.quantity.to_string(),
            price: domain.price.to_string(),
            amount: domain.amount.to_string(),
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        }
    }
}
