use async_trait::async_trait;

use super::balances_model::DailyBalance;
use crate::errors::Result;

#[async_trait]
pub trait BalanceRepositoryTrait: Send + Sync {
    /// Upserts the series keyed on `(account_id, date)` and returns the row count.
    async fn upsert_balances(&self, balances: Vec<DailyBalance>) -> Result<usize>;

    /// Balances of an account in ascending date order.
    fn list_balances(&self, account_id: &str) -> Result<Vec<DailyBalance>>;
}
