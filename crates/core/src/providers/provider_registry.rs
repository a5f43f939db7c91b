//! Lookup of provider clients by the name stored on a linked item.

use std::collections::HashMap;
use std::sync::Arc;

use super::provider_traits::ProviderClient;
use crate::errors::{Error, Result};

/// Holds one client per configured provider (e.g. one per region).
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Arc<dyn ProviderClient>) -> Self {
        self.register(provider);
        self
    }

    pub fn register(&mut self, provider: Arc<dyn ProviderClient>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn ProviderClient>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Config(format!("No provider client registered for '{}'", name)))
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}
