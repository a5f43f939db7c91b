//! Account domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::accounts_constants::LIABILITY_META_KEY;
use crate::{errors::ValidationError, Error, Result};

/// Balance-sheet side of an account. Drives the sign of entry flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountClassification {
    #[default]
    Asset,
    Liability,
}

impl AccountClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountClassification::Asset => "asset",
            AccountClassification::Liability => "liability",
        }
    }

    /// Parses a stored classification, defaulting to asset.
    pub fn parse(value: &str) -> Self {
        match value {
            "liability" => AccountClassification::Liability,
            _ => AccountClassification::Asset,
        }
    }
}

/// Domain model representing an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub family_id: String,
    /// Set for accounts imported from an aggregation connection.
    pub linked_item_id: Option<String>,
    /// Account ID in the provider's system
    pub external_id: Option<String>,
    pub name: String,
    pub account_type: String,
    pub subtype: Option<String>,
    pub classification: AccountClassification,
    pub currency: String,
    pub balance: Decimal,
    pub cash_balance: Decimal,
    pub is_active: bool,
    /// Additional metadata as JSON string
    pub meta: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    pub fn is_manual(&self) -> bool {
        self.linked_item_id.is_none()
    }

    pub fn is_linked(&self) -> bool {
        self.linked_item_id.is_some()
    }
}

/// Input model for creating a manual account or upserting an imported one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub family_id: String,
    pub linked_item_id: Option<String>,
    pub external_id: Option<String>,
    pub name: String,
    pub account_type: String,
    pub subtype: Option<String>,
    pub classification: AccountClassification,
    pub currency: String,
    pub balance: Decimal,
    pub is_active: bool,
    pub meta: Option<String>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        if self.linked_item_id.is_some() && self.external_id.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "external_id".to_string(),
            )));
        }
        Ok(())
    }
}

/// Liability details imported from a provider and kept in the account meta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LiabilityDetails {
    Credit {
        apr_percentage: Option<Decimal>,
        minimum_payment: Option<Decimal>,
        last_statement_balance: Option<Decimal>,
    },
    Mortgage {
        interest_rate_percentage: Option<Decimal>,
        maturity_date: Option<NaiveDate>,
        origination_principal: Option<Decimal>,
    },
    Student {
        interest_rate_percentage: Option<Decimal>,
        minimum_payment: Option<Decimal>,
        expected_payoff_date: Option<NaiveDate>,
    },
}

/// Reads the liability details from an account's meta JSON.
///
/// Returns `None` if meta is missing, not valid JSON, or has no liability key.
pub fn get_liability_details(account: &Account) -> Option<LiabilityDetails> {
    account
        .meta
        .as_ref()
        .filter(|meta_str| !meta_str.is_empty())
        .and_then(|meta_str| serde_json::from_str::<Value>(meta_str).ok())
        .and_then(|json| json.get(LIABILITY_META_KEY).cloned())
        .and_then(|value| serde_json::from_value::<LiabilityDetails>(value).ok())
}

/// Writes liability details into a meta JSON string, preserving other fields.
///
/// If meta is None, empty, or invalid JSON, creates a new JSON object.
pub fn set_liability_details(meta: Option<&str>, details: &LiabilityDetails) -> Result<String> {
    let mut json_obj = meta
        .filter(|s| !s.is_empty())
        .and_then(|meta_str| serde_json::from_str::<Value>(meta_str).ok())
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();

    json_obj.insert(LIABILITY_META_KEY.to_string(), serde_json::to_value(details)?);

    Ok(serde_json::to_string(&json_obj)?)
}
