use async_trait::async_trait;

use super::families_model::{Family, NewFamily};
use crate::errors::Result;

#[async_trait]
pub trait FamilyRepositoryTrait: Send + Sync {
    async fn create(&self, new_family: NewFamily) -> Result<Family>;

    fn get_by_id(&self, family_id: &str) -> Result<Family>;

    fn list(&self) -> Result<Vec<Family>>;
}
