use async_trait::async_trait;

use super::transfers_model::{RejectedPair, Transfer, TransferMatchConfig};
use crate::errors::Result;

#[async_trait]
pub trait TransferRepositoryTrait: Send + Sync {
    /// Loads the family's candidates and rejected pairs, plans the matches and
    /// inserts the links, all in one unit of work. Returns the created links.
    async fn auto_match(&self, family_id: &str, config: TransferMatchConfig)
        -> Result<Vec<Transfer>>;

    async fn confirm(&self, transfer_id: &str) -> Result<Transfer>;

    /// Deletes the link and records its pair as rejected, atomically.
    async fn reject(&self, transfer_id: &str) -> Result<RejectedPair>;

    fn get_by_id(&self, transfer_id: &str) -> Result<Transfer>;

    fn list_for_family(&self, family_id: &str) -> Result<Vec<Transfer>>;
}
