//! The capability set every aggregation provider implements.

use async_trait::async_trait;

use super::provider_models::{
    DateRange, InvestmentsSnapshot, LiabilitiesSnapshot, ProviderAccount, ProviderInstitution,
    ProviderItem, PublicTokenExchange, TransactionsPage,
};
use crate::errors::Result;

/// Client for one upstream aggregator.
///
/// Failures from the provider surface as `Error::Provider`, which carries the
/// machine-readable code the import pipeline inspects.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Stable name stored on linked items (e.g. "plaid", "plaid_eu").
    fn name(&self) -> &str;

    async fn exchange_public_token(&self, public_token: &str) -> Result<PublicTokenExchange>;

    async fn get_item(&self, access_token: &str) -> Result<ProviderItem>;

    async fn get_institution(&self, institution_id: &str) -> Result<ProviderInstitution>;

    async fn get_accounts(&self, access_token: &str) -> Result<Vec<ProviderAccount>>;

    /// Fetches one page of changes since `cursor`. Callers loop until `has_more` is false.
    async fn get_transactions(
        &self,
        access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsPage>;

    async fn get_investments(
        &self,
        access_token: &str,
        window: DateRange,
    ) -> Result<InvestmentsSnapshot>;

    async fn get_liabilities(&self, access_token: &str) -> Result<LiabilitiesSnapshot>;

    /// Revokes the credential upstream.
    async fn remove_item(&self, access_token: &str) -> Result<()>;

    /// Fails with `Error::Webhook` when the signature, age or body hash is invalid.
    async fn validate_webhook(&self, signature_header: &str, raw_body: &str) -> Result<()>;
}
