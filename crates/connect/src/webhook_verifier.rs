//! ES256 signature checks for inbound webhooks.
//!
//! The aggregator signs each webhook with a JWT in the `Plaid-Verification`
//! header. The JWT names its signing key by `kid`; keys are fetched once and
//! cached for the life of the process.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use ledgersync_core::webhooks::{
    verify_webhook_claims, WebhookClaims, WebhookConfig, WebhookError,
};

/// Public half of a webhook signing key, in JWK form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    pub kid: String,
    pub alg: String,
    pub crv: String,
    pub kty: String,
    pub x: String,
    pub y: String,
    /// Seconds since the epoch after which the key must not be trusted.
    #[serde(default)]
    pub expired_at: Option<i64>,
}

impl VerificationKey {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expired_at.is_some_and(|at| at <= now.timestamp())
    }
}

pub struct WebhookVerifier {
    keys: RwLock<HashMap<String, VerificationKey>>,
    config: WebhookConfig,
}

impl WebhookVerifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            keys: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Reads the signing key id from the token header. Only ES256 is accepted.
    pub fn key_id(signature_header: &str) -> Result<String, WebhookError> {
        let header = decode_header(signature_header.trim())
            .map_err(|e| WebhookError::MalformedSignature(e.to_string()))?;
        if header.alg != Algorithm::ES256 {
            return Err(WebhookError::MalformedSignature(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }
        header
            .kid
            .filter(|kid| !kid.is_empty())
            .ok_or_else(|| WebhookError::MalformedSignature("missing kid".to_string()))
    }

    pub async fn cached_key(&self, kid: &str) -> Option<VerificationKey> {
        self.keys.read().await.get(kid).cloned()
    }

    pub async fn remember(&self, key: VerificationKey) {
        debug!("Caching webhook verification key {}", key.kid);
        self.keys.write().await.insert(key.kid.clone(), key);
    }

    /// Checks the token signature against `key`, then the claim age and body hash.
    pub fn verify(
        &self,
        signature_header: &str,
        key: &VerificationKey,
        raw_body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        if key.is_expired(now) {
            return Err(WebhookError::UnknownKey(key.kid.clone()));
        }

        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)
            .map_err(|e| WebhookError::InvalidSignature(format!("bad key {}: {}", key.kid, e)))?;

        // Freshness is judged on `iat` by the shared claim checks.
        let mut validation = Validation::new(Algorithm::ES256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        let token = decode::<WebhookClaims>(signature_header.trim(), &decoding_key, &validation)
            .map_err(|e| WebhookError::InvalidSignature(e.to_string()))?;

        verify_webhook_claims(&token.claims, raw_body, now, &self.config)
    }
}
