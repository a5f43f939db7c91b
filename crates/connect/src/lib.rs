//! Aggregation provider connectivity for ledgersync.
//!
//! Provides the concrete HTTP [`ProviderClient`](ledgersync_core::providers::ProviderClient)
//! used by the import pipeline and the verifier for signed inbound webhooks.

mod api_models;
pub mod client;
pub mod config;
pub mod webhook_verifier;

pub use client::HttpProviderClient;
pub use config::{ProviderClientConfig, DEFAULT_PROVIDER_BASE_URL, DEFAULT_PROVIDER_NAME};
pub use webhook_verifier::{VerificationKey, WebhookVerifier};
