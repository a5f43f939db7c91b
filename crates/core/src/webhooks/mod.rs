//! Inbound provider push notifications.

mod webhooks_errors;
mod webhooks_model;
mod webhooks_processor;
mod webhooks_verification;

pub use webhooks_errors::WebhookError;
pub use webhooks_model::*;
pub use webhooks_processor::WebhookProcessor;
pub use webhooks_verification::{body_sha256_hex, verify_webhook_claims};
