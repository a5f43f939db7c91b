use async_trait::async_trait;

use super::investments_model::{Holding, NewHolding, NewSecurity, Security};
use crate::entries::UpsertSummary;
use crate::errors::Result;

#[async_trait]
pub trait InvestmentRepositoryTrait: Send + Sync {
    /// Finds or creates securities keyed on `provider_security_id`.
    ///
    /// Returns one row per distinct key. Callers must dedupe the input first;
    /// duplicates in one batch are tolerated but collapse to one row.
    async fn upsert_securities(&self, securities: Vec<NewSecurity>) -> Result<Vec<Security>>;

    /// Upserts holdings keyed on `(account_id, security_id, date)`.
    async fn upsert_holdings(&self, holdings: Vec<NewHolding>) -> Result<UpsertSummary>;

    fn list_holdings(&self, account_id: &str) -> Result<Vec<Holding>>;
}
