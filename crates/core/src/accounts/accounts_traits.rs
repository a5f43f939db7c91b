//! Account repository trait.
//!
//! This trait defines the contract for account persistence without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new (usually manual) account.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Inserts or updates an imported account keyed on `(linked_item_id, external_id)`.
    ///
    /// Repeated calls with the same key converge on a single row. Provider-owned
    /// fields (name, type, subtype, currency, balance) are overwritten; `is_active`
    /// and `meta` are preserved on update.
    async fn upsert_linked(&self, new_account: NewAccount) -> Result<Account>;

    /// Stores the recomputed current balance.
    async fn update_balances(
        &self,
        account_id: &str,
        balance: Decimal,
        cash_balance: Decimal,
    ) -> Result<()>;

    async fn update_meta(&self, account_id: &str, meta: String) -> Result<()>;

    async fn set_active(&self, account_id: &str, is_active: bool) -> Result<()>;

    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists a family's accounts, optionally filtered by active status.
    fn list_for_family(
        &self,
        family_id: &str,
        is_active_filter: Option<bool>,
    ) -> Result<Vec<Account>>;

    fn list_for_item(&self, linked_item_id: &str) -> Result<Vec<Account>>;
}
