//! Linked item domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::providers::Product;
use crate::{errors::ValidationError, Error, Result};

/// Connection health of a linked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkedItemStatus {
    #[default]
    Good,
    /// The provider reported the login as stale. Shown as "reconnect required".
    RequiresUpdate,
    Error,
}

impl LinkedItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkedItemStatus::Good => "good",
            LinkedItemStatus::RequiresUpdate => "requires_update",
            LinkedItemStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "good" => Ok(LinkedItemStatus::Good),
            "requires_update" => Ok(LinkedItemStatus::RequiresUpdate),
            "error" => Ok(LinkedItemStatus::Error),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown linked item status '{}'",
                other
            )))),
        }
    }
}

/// One aggregation connection.
///
/// `access_token` is an opaque credential; the `Debug` impl redacts it so it
/// never reaches a log line.
#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LinkedItem {
    pub id: String,
    pub family_id: String,
    /// Name of the provider client that owns this connection.
    pub provider: String,
    pub external_id: String,
    #[serde(skip_serializing)]
    pub access_token: String,
    pub name: String,
    pub status: LinkedItemStatus,
    pub products: Vec<Product>,
    pub institution_id: Option<String>,
    pub institution_url: Option<String>,
    pub logo_url: Option<String>,
    pub brand_color: Option<String>,
    /// Opaque incremental-fetch bookmark for transactions.
    pub cursor: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl LinkedItem {
    pub fn supports(&self, product: Product) -> bool {
        self.products.contains(&product)
    }

    pub fn requires_update(&self) -> bool {
        self.status == LinkedItemStatus::RequiresUpdate
    }
}

impl std::fmt::Debug for LinkedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedItem")
            .field("id", &self.id)
            .field("family_id", &self.family_id)
            .field("provider", &self.provider)
            .field("external_id", &self.external_id)
            .field("access_token", &"[redacted]")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("products", &self.products)
            .field("institution_id", &self.institution_id)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLinkedItem {
    pub family_id: String,
    pub provider: String,
    pub external_id: String,
    pub access_token: String,
    pub name: String,
}

impl NewLinkedItem {
    pub fn validate(&self) -> Result<()> {
        if self.external_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "external_id".to_string(),
            )));
        }
        if self.access_token.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "access_token".to_string(),
            )));
        }
        Ok(())
    }
}

/// Cosmetic institution metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionDetails {
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo_url: Option<String>,
    pub brand_color: Option<String>,
}
