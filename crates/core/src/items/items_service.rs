use std::sync::Arc;

use log::{info, warn};

use super::items_model::{LinkedItem, NewLinkedItem};
use super::items_traits::LinkedItemRepositoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::providers::ProviderRegistry;
use crate::sync::{SyncScheduler, SyncTarget, SyncWindow};

/// Connects and disconnects aggregation logins.
pub struct LinkedItemService {
    items: Arc<dyn LinkedItemRepositoryTrait>,
    providers: Arc<ProviderRegistry>,
    scheduler: Arc<SyncScheduler>,
}

impl LinkedItemService {
    pub fn new(
        items: Arc<dyn LinkedItemRepositoryTrait>,
        providers: Arc<ProviderRegistry>,
        scheduler: Arc<SyncScheduler>,
    ) -> Self {
        Self {
            items,
            providers,
            scheduler,
        }
    }

    /// Exchanges a public token for a credential, stores the item and queues
    /// its first sync.
    ///
    /// Linking an upstream item that is already stored is a reconnect: the
    /// existing item keeps its history, takes the new credential and goes
    /// back to `good`.
    pub async fn create_from_public_token(
        &self,
        family_id: &str,
        provider: &str,
        public_token: &str,
        name: &str,
    ) -> Result<LinkedItem> {
        let client = self.providers.get(provider)?;
        let exchange = client.exchange_public_token(public_token).await?;

        let new_item = NewLinkedItem {
            family_id: family_id.to_string(),
            provider: client.name().to_string(),
            external_id: exchange.item_id,
            access_token: exchange.access_token,
            name: name.to_string(),
        };
        new_item.validate()?;

        let item = match self.items.find_by_external_id(&new_item.external_id)? {
            Some(existing) => {
                if existing.family_id != family_id {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Item {} is linked to another family",
                        existing.id
                    ))));
                }
                self.items
                    .update_credentials(&existing.id, new_item.access_token)
                    .await?;
                info!(
                    "Linked item {} reconnected for family {}",
                    existing.id, family_id
                );
                self.items.get_by_id(&existing.id)?
            }
            None => {
                let item = self.items.create(new_item).await?;
                info!(
                    "Linked item {} created for family {} via {}",
                    item.id, family_id, item.provider
                );
                item
            }
        };

        self.scheduler
            .sync_later(SyncTarget::Item(item.id.clone()), SyncWindow::default(), None)
            .await?;
        Ok(item)
    }

    /// Revokes the credential upstream (best-effort) and deletes the item
    /// together with its accounts.
    pub async fn disconnect(&self, item_id: &str) -> Result<()> {
        let item = self.items.get_by_id(item_id)?;

        match self.providers.get(&item.provider) {
            Ok(client) => {
                if let Err(e) = client.remove_item(&item.access_token).await {
                    warn!("Failed to revoke item {} upstream: {}", item.id, e);
                }
            }
            Err(e) => warn!("Cannot revoke item {} upstream: {}", item.id, e),
        }

        self.items.delete(item_id).await?;
        info!("Linked item {} disconnected", item_id);
        Ok(())
    }
}
