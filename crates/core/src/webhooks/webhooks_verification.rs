//! Claim checks shared by every provider's signature verification.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use super::webhooks_errors::WebhookError;
use super::webhooks_model::{WebhookClaims, WebhookConfig};

pub fn body_sha256_hex(raw_body: &[u8]) -> String {
    hex::encode(Sha256::digest(raw_body))
}

/// Rejects claims issued more than `config.max_age` before `now`, and claims
/// whose body hash does not match `raw_body`.
///
/// The signature itself is checked by the provider client before this runs.
pub fn verify_webhook_claims(
    claims: &WebhookClaims,
    raw_body: &[u8],
    now: DateTime<Utc>,
    config: &WebhookConfig,
) -> Result<(), WebhookError> {
    let age_secs = now.timestamp() - claims.iat;
    let max_age_secs = config.max_age.num_seconds();
    if age_secs > max_age_secs {
        return Err(WebhookError::Stale {
            age_secs,
            max_age_secs,
        });
    }

    if !claims
        .request_body_sha256
        .eq_ignore_ascii_case(&body_sha256_hex(raw_body))
    {
        return Err(WebhookError::BodyHashMismatch);
    }
    Ok(())
}
