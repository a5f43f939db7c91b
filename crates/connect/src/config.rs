use std::time::Duration;

use ledgersync_core::webhooks::WebhookConfig;

pub const DEFAULT_PROVIDER_NAME: &str = "plaid";
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://sandbox.plaid.com";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for one aggregator deployment.
#[derive(Clone)]
pub struct ProviderClientConfig {
    /// Name stored on linked items created through this client.
    pub name: String,
    pub base_url: String,
    pub client_id: String,
    pub secret: String,
    pub timeout: Duration,
    /// Country codes sent with institution lookups.
    pub country_codes: Vec<String>,
    pub webhook: WebhookConfig,
}

impl ProviderClientConfig {
    pub fn new(base_url: &str, client_id: &str, secret: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            secret: secret.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ProviderClientConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            client_id: String::new(),
            secret: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            country_codes: vec!["US".to_string(), "CA".to_string()],
            webhook: WebhookConfig::default(),
        }
    }
}

impl std::fmt::Debug for ProviderClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClientConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("secret", &"[redacted]")
            .field("timeout", &self.timeout)
            .finish()
    }
}
