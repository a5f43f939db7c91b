//! Provider capability, payload models and errors.

mod provider_errors;
mod provider_models;
mod provider_registry;
mod provider_traits;

pub use provider_errors::{ProviderError, ProviderErrorKind};
pub use provider_models::*;
pub use provider_registry::ProviderRegistry;
pub use provider_traits::ProviderClient;
