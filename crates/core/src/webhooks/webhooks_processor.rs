//! Verifies and dispatches provider webhooks.
//!
//! Processing never fails toward the caller: the ingress endpoint must
//! acknowledge every delivery or the provider eventually disables it.
//! Everything that goes wrong is logged or sent to the error reporter.

use std::sync::Arc;

use log::{debug, info, warn};

use super::webhooks_errors::WebhookError;
use super::webhooks_model::{WebhookAction, WebhookPayload};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::items::{LinkedItem, LinkedItemRepositoryTrait, LinkedItemStatus};
use crate::providers::ProviderRegistry;
use crate::reporting::ErrorReporter;
use crate::sync::{SyncScheduler, SyncTarget, SyncWindow};

pub struct WebhookProcessor {
    providers: Arc<ProviderRegistry>,
    items: Arc<dyn LinkedItemRepositoryTrait>,
    scheduler: Arc<SyncScheduler>,
    error_reporter: Arc<dyn ErrorReporter>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl WebhookProcessor {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        items: Arc<dyn LinkedItemRepositoryTrait>,
        scheduler: Arc<SyncScheduler>,
        error_reporter: Arc<dyn ErrorReporter>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            providers,
            items,
            scheduler,
            error_reporter,
            event_sink,
        }
    }

    /// Validates the delivery with `provider` and acts on it.
    pub async fn process(&self, provider: &str, signature_header: &str, raw_body: &str) {
        if let Err(e) = self.verify(provider, signature_header, raw_body).await {
            warn!("Rejected {} webhook: {}", provider, e);
            self.error_reporter
                .report(&e, &format!("webhook verification ({})", provider));
            return;
        }

        let payload = match serde_json::from_str::<WebhookPayload>(raw_body) {
            Ok(payload) => payload,
            Err(e) => {
                let err = Error::Webhook(WebhookError::MalformedPayload(e.to_string()));
                self.error_reporter
                    .report(&err, &format!("webhook parsing ({})", provider));
                return;
            }
        };

        if let Err(e) = self.dispatch(&payload).await {
            self.error_reporter.report(
                &e,
                &format!(
                    "webhook {}/{} for item {}",
                    payload.webhook_type,
                    payload.webhook_code,
                    payload.item_id.as_deref().unwrap_or("-")
                ),
            );
        }
    }

    async fn verify(&self, provider: &str, signature_header: &str, raw_body: &str) -> Result<()> {
        self.providers
            .get(provider)?
            .validate_webhook(signature_header, raw_body)
            .await
    }

    /// Applies an already verified payload.
    pub async fn dispatch(&self, payload: &WebhookPayload) -> Result<()> {
        let action = payload.action();
        debug!(
            "Webhook {}/{} -> {:?}",
            payload.webhook_type, payload.webhook_code, action
        );

        match action {
            WebhookAction::Ignore => {
                info!(
                    "Ignoring unhandled webhook {}/{}",
                    payload.webhook_type, payload.webhook_code
                );
                Ok(())
            }
            WebhookAction::SyncItem => {
                let item = self.find_item(payload)?;
                let record = self
                    .scheduler
                    .sync_later(SyncTarget::Item(item.id.clone()), SyncWindow::default(), None)
                    .await?;
                info!(
                    "Webhook {}/{} scheduled sync record {} for item {}",
                    payload.webhook_type, payload.webhook_code, record.id, item.id
                );
                Ok(())
            }
            WebhookAction::MarkRequiresUpdate => {
                let item = self.find_item(payload)?;
                self.items
                    .update_status(&item.id, LinkedItemStatus::RequiresUpdate)
                    .await?;
                self.event_sink
                    .emit(DomainEvent::linked_item_requires_update(item.id.clone()));
                warn!("Item {} requires re-authentication", item.id);
                Ok(())
            }
        }
    }

    fn find_item(&self, payload: &WebhookPayload) -> Result<LinkedItem> {
        let external_id = payload
            .item_id
            .as_deref()
            .ok_or_else(|| Error::Webhook(WebhookError::MalformedPayload("missing item_id".into())))?;
        self.items
            .find_by_external_id(external_id)?
            .ok_or_else(|| Error::not_found("LinkedItem", external_id))
    }
}
