use async_trait::async_trait;

use super::entries_model::{Entry, NewEntry, UpsertSummary};
use crate::errors::Result;

#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    /// Creates a single entry with its payload (manual entry path).
    async fn create(&self, new_entry: NewEntry) -> Result<Entry>;

    /// Last-write-wins upsert keyed on `(account_id, external_id)`.
    ///
    /// Entries without an external id are always inserted. The batch is
    /// applied atomically.
    async fn upsert_entries(&self, entries: Vec<NewEntry>) -> Result<UpsertSummary>;

    /// Deletes imported entries by external id, scoped to the given accounts.
    async fn delete_by_external_ids(
        &self,
        account_ids: Vec<String>,
        external_ids: Vec<String>,
    ) -> Result<usize>;

    fn get_by_id(&self, entry_id: &str) -> Result<Entry>;

    /// All entries of an account ordered by date, then creation.
    fn list_for_account(&self, account_id: &str) -> Result<Vec<Entry>>;
}
