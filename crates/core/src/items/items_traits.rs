use async_trait::async_trait;

use super::items_model::{InstitutionDetails, LinkedItem, LinkedItemStatus, NewLinkedItem};
use crate::errors::Result;
use crate::providers::Product;

#[async_trait]
pub trait LinkedItemRepositoryTrait: Send + Sync {
    async fn create(&self, new_item: NewLinkedItem) -> Result<LinkedItem>;

    async fn update_status(&self, item_id: &str, status: LinkedItemStatus) -> Result<()>;

    /// Stores the item-level metadata fetched at the start of an import.
    async fn update_products(
        &self,
        item_id: &str,
        products: Vec<Product>,
        institution_id: Option<String>,
    ) -> Result<()>;

    async fn update_institution(&self, item_id: &str, details: InstitutionDetails) -> Result<()>;

    /// Persists the transactions cursor. Only called once a delta has been applied.
    async fn update_cursor(&self, item_id: &str, cursor: String) -> Result<()>;

    /// Replaces the access token after a reconnect and marks the item `good`.
    async fn update_credentials(&self, item_id: &str, access_token: String) -> Result<()>;

    /// Deletes the item and, by cascade, its accounts.
    async fn delete(&self, item_id: &str) -> Result<usize>;

    fn get_by_id(&self, item_id: &str) -> Result<LinkedItem>;

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<LinkedItem>>;

    fn list_for_family(&self, family_id: &str) -> Result<Vec<LinkedItem>>;
}
