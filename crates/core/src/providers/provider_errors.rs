//! Structured errors returned by aggregation providers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::REAUTH_REQUIRED_ERROR_CODE;

/// Classification of a provider error, used to decide retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderErrorKind {
    /// The stored credential is invalid. Needs a new user-initiated exchange.
    ReauthRequired,
    /// Network failure, timeout, rate limit or 5xx. Safe to retry with a new sync.
    Transient,
    /// Anything else the provider rejected.
    Other,
}

/// Error reported by an aggregation provider.
///
/// `code` is the machine-readable code from the provider payload. The import
/// pipeline never inspects it directly; it asks [`ProviderError::requires_reauth`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
    pub status: Option<u16>,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    /// Builds an error from a provider response, classifying it by code and status.
    pub fn from_response(status: Option<u16>, code: &str, message: &str) -> Self {
        let kind = if code == REAUTH_REQUIRED_ERROR_CODE {
            ProviderErrorKind::ReauthRequired
        } else if matches!(status, Some(s) if s == 429 || s >= 500) {
            ProviderErrorKind::Transient
        } else {
            ProviderErrorKind::Other
        };

        Self {
            code: code.to_string(),
            message: message.to_string(),
            status,
            kind,
        }
    }

    pub fn reauth_required(message: &str) -> Self {
        Self::from_response(Some(400), REAUTH_REQUIRED_ERROR_CODE, message)
    }

    /// Network-level failure where no provider payload was received.
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            code: "NETWORK_ERROR".to_string(),
            message: message.into(),
            status: None,
            kind: ProviderErrorKind::Transient,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.kind == ProviderErrorKind::ReauthRequired
    }

    pub fn is_transient(&self) -> bool {
        self.kind == ProviderErrorKind::Transient
    }
}
