use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{REAUTH_REQUIRED_ERROR_CODE, WEBHOOK_MAX_AGE_SECS};

/// The subset of a provider webhook body the processor acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub webhook_type: String,
    pub webhook_code: String,
    pub item_id: Option<String>,
    #[serde(default)]
    pub error: Option<WebhookItemError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookItemError {
    pub error_code: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Claims carried by the signed verification token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookClaims {
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Lowercase hex SHA-256 of the raw request body.
    pub request_body_sha256: String,
}

/// What the processor does with a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAction {
    SyncItem,
    MarkRequiresUpdate,
    Ignore,
}

impl WebhookPayload {
    /// Dispatch table keyed on `(webhook_type, webhook_code)`.
    pub fn action(&self) -> WebhookAction {
        match (self.webhook_type.as_str(), self.webhook_code.as_str()) {
            (
                "TRANSACTIONS",
                "SYNC_UPDATES_AVAILABLE" | "INITIAL_UPDATE" | "HISTORICAL_UPDATE"
                | "DEFAULT_UPDATE" | "TRANSACTIONS_REMOVED",
            ) => WebhookAction::SyncItem,
            ("INVESTMENTS_TRANSACTIONS", "DEFAULT_UPDATE" | "HISTORICAL_UPDATE") => {
                WebhookAction::SyncItem
            }
            ("HOLDINGS", "DEFAULT_UPDATE") => WebhookAction::SyncItem,
            ("ITEM", "ERROR")
                if self
                    .error
                    .as_ref()
                    .is_some_and(|e| e.error_code == REAUTH_REQUIRED_ERROR_CODE) =>
            {
                WebhookAction::MarkRequiresUpdate
            }
            _ => WebhookAction::Ignore,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Signed webhooks older than this are rejected as replays.
    pub max_age: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::seconds(WEBHOOK_MAX_AGE_SECS),
        }
    }
}
