use chrono::NaiveDateTime;
use diesel::prelude::*;

use ledgersync_core::transfers::{NewTransfer, RejectedPair, Transfer, TransferStatus};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transfers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransferDB {
    pub id: String,
    pub inflow_entry_id: String,
    pub outflow_entry_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TransferDB> for Transfer {
    fn from(db: TransferDB) -> Self {
        let status = TransferStatus::parse(&db.status).unwrap_or_else(|e| {
            log::warn!("Transfer {} has an unreadable status: {}", db.id, e);
            TransferStatus::Unconfirmed
        });
        Self {
            id: db.id,
            inflow_entry_id: db.inflow_entry_id,
            outflow_entry_id: db.outflow_entry_id,
            status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewTransfer> for TransferDB {
    fn from(domain: NewTransfer) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            inflow_entry_id: domain.inflow_entry_id,
            outflow_entry_id: domain.outflow_entry_id,
            status: domain.status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::rejected_transfers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RejectedTransferDB {
    pub inflow_entry_id: String,
    pub outflow_entry_id: String,
    pub created_at: NaiveDateTime,
}

impl From<RejectedTransferDB> for RejectedPair {
    fn from(db: RejectedTransferDB) -> Self {
        Self {
            inflow_entry_id: db.inflow_entry_id,
            outflow_entry_id: db.outflow_entry_id,
        }
    }
}

impl From<RejectedPair> for RejectedTransferDB {
    fn from(domain: RejectedPair) -> Self {
        Self {
            inflow_entry_id: domain.inflow_entry_id,
            outflow_entry_id: domain.outflow_entry_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
