use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use ledgersync_connect::{ProviderClientConfig, DEFAULT_PROVIDER_BASE_URL};

/// Periodic family sync: every 4 hours unless overridden.
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 4 * 60 * 60;

const DEFAULT_SYNC_WORKERS: usize = 4;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub request_timeout: Duration,
    /// Number of sync records executed concurrently.
    pub sync_workers: usize,
    pub sync_interval: Duration,
    pub provider: ProviderClientConfig,
    /// `text` or `json`.
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("LEDGERSYNC_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid LEDGERSYNC_LISTEN_ADDR")?;
        let db_path = std::env::var("LEDGERSYNC_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let timeout_ms: u64 = std::env::var("LEDGERSYNC_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let sync_workers: usize = std::env::var("LEDGERSYNC_SYNC_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_SYNC_WORKERS);
        let sync_interval_secs: u64 = std::env::var("LEDGERSYNC_SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS);

        let provider = ProviderClientConfig::new(
            &std::env::var("LEDGERSYNC_PROVIDER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.into()),
            &std::env::var("LEDGERSYNC_PROVIDER_CLIENT_ID").unwrap_or_default(),
            &std::env::var("LEDGERSYNC_PROVIDER_SECRET").unwrap_or_default(),
        );
        let log_format =
            std::env::var("LEDGERSYNC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            listen_addr,
            db_path,
            request_timeout: Duration::from_millis(timeout_ms),
            sync_workers,
            sync_interval: Duration::from_secs(sync_interval_secs),
            provider,
            log_format,
        })
    }
}
