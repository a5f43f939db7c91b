//! Entry domain models.
//!
//! Sign convention: a negative amount is money flowing into the account, a
//! positive amount is money flowing out.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Discriminator stored alongside every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Transaction,
    Trade,
    Valuation,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Transaction => "transaction",
            EntryKind::Trade => "trade",
            EntryKind::Valuation => "valuation",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "transaction" => Ok(EntryKind::Transaction),
            "trade" => Ok(EntryKind::Trade),
            "valuation" => Ok(EntryKind::Valuation),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown entry kind '{}'",
                other
            )))),
        }
    }
}

/// The payload record created together with an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryPayload {
    Transaction {
        merchant_name: Option<String>,
        pending: bool,
    },
    Trade {
        security_id: String,
        quantity: Decimal,
        price: Decimal,
    },
    /// The amount is the absolute account balance on the entry date.
    Valuation,
}

impl EntryPayload {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryPayload::Transaction { .. } => EntryKind::Transaction,
            EntryPayload::Trade { .. } => EntryKind::Trade,
            EntryPayload::Valuation => EntryKind::Valuation,
        }
    }

    pub fn transaction() -> Self {
        EntryPayload::Transaction {
            merchant_name: None,
            pending: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub account_id: String,
    /// Provider-assigned identifier; the upsert key for imported entries.
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub payload: EntryPayload,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.payload.kind()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub account_id: String,
    pub external_id: Option<String>,
    pub date: NaiveDate,
    pub name: String,
    pub amount: Decimal,
    pub currency: String,
    pub payload: EntryPayload,
}

impl NewEntry {
    pub fn validate(&self) -> Result<()> {
        if self.account_id.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "account_id".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "currency".to_string(),
            )));
        }
        Ok(())
    }
}

/// Outcome of a keyed upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertSummary {
    pub fn merge(&mut self, other: UpsertSummary) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}
