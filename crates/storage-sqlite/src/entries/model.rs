//! Database model for entries.
//!
//! The entry row carries the shared fields; the kind-specific payload is kept
//! as JSON next to its `kind` discriminator.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::entries::{Entry, EntryKind, EntryPayload, NewEntry};

use crate::utils::{format_date, parse_date, parse_decimal};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntryDB {
    pub id: String,
    pub account_id: String,
    pub external_id: Option<String>,
    pub date: String,
    pub name: String,
    pub amount: String,
    pub currency: String,
    pub kind: String,
    pub payload: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_payload(db: &EntryDB) -> EntryPayload {
    match serde_json::from_str::<EntryPayload>(&db.payload) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("Entry {} has an unreadable payload: {}", db.id, e);
            match EntryKind::parse(&db.kind) {
                Ok(EntryKind::Valuation) => EntryPayload::Valuation,
                _ => EntryPayload::transaction(),
            }
        }
    }
}

impl From<EntryDB> for Entry {
    fn from(db: EntryDB) -> Self {
        let payload = parse_payload(&db);
        Self {
            date: parse_date(&db.date, "date"),
            amount: parse_decimal(&db.amount, "amount"),
            payload,
            id: db.id,
            account_id: db.account_id,
            external_id: db.external_id,
            name: db.name,
            currency: db.currency,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl EntryDB {
    pub fn from_new(domain: NewEntry) -> ledgersync_core::Result<Self> {
        let now = chrono::Utc::now().naive_utc();
        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            kind: domain.payload.kind().as_str().to_string(),
            payload: serde_json::to_string(&domain.payload)?,
            account_id: domain.account_id,
            external_id: domain.external_id,
            date: format_date(domain.date),
            name: domain.name,
            amount: domain.amount.to_string(),
            currency: domain.currency,
            created_at: now,
            updated_at: now,
        })
    }
}
