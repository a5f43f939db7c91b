use thiserror::Error;

/// Reasons an inbound webhook is refused before dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Missing or malformed signature header: {0}")]
    MalformedSignature(String),

    #[error("No signing key found for key id '{0}'")]
    UnknownKey(String),

    #[error("Signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("Webhook is {age_secs}s old, older than the allowed {max_age_secs}s")]
    Stale { age_secs: i64, max_age_secs: i64 },

    #[error("Request body hash does not match the signed hash")]
    BodyHashMismatch,

    #[error("Webhook payload could not be parsed: {0}")]
    MalformedPayload(String),
}
