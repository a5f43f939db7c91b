use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::TRANSFER_DATE_WINDOW_DAYS;
use crate::entries::EntryKind;
use crate::{errors::ValidationError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    #[default]
    Unconfirmed,
    Confirmed,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Unconfirmed => "unconfirmed",
            TransferStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "unconfirmed" => Ok(TransferStatus::Unconfirmed),
            "confirmed" => Ok(TransferStatus::Confirmed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transfer status '{}'",
                other
            )))),
        }
    }
}

/// Link between the inflow and outflow legs of one money movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub inflow_entry_id: String,
    pub outflow_entry_id: String,
    pub status: TransferStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub inflow_entry_id: String,
    pub outflow_entry_id: String,
    pub status: TransferStatus,
}

/// A pair a user declined. Never proposed again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedPair {
    pub inflow_entry_id: String,
    pub outflow_entry_id: String,
}

/// A transaction considered by the matcher.
///
/// Storage loads these for one family: transaction entries of active accounts
/// that are not yet part of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCandidate {
    pub entry_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferMatchConfig {
    /// Maximum absolute distance in days between the two legs.
    pub date_window_days: i64,
}

impl Default for TransferMatchConfig {
    fn default() -> Self {
        Self {
            date_window_days: TRANSFER_DATE_WINDOW_DAYS,
        }
    }
}
