//! Target-specific sync hooks.
//!
//! Family syncs fan out into child records and return without waiting for
//! them. Every child completes on its own and item children run transfer
//! matching themselves, which is safe to repeat.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::sync_model::{SyncRecord, SyncTarget, SyncWindow};
use super::sync_scheduler::SyncScheduler;
use super::sync_traits::SyncHandler;
use crate::accounts::AccountRepositoryTrait;
use crate::balances::{BalanceCalculator, BalanceRepositoryTrait};
use crate::entries::EntryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::import::ImportPipeline;
use crate::investments::InvestmentRepositoryTrait;
use crate::items::LinkedItemRepositoryTrait;
use crate::transfers::TransferService;
use crate::utils::time_utils::today_utc;

fn unexpected_target(expected: &str, record: &SyncRecord) -> Error {
    Error::Unexpected(format!(
        "{} handler received record {} for {}",
        expected, record.id, record.target
    ))
}

/// Group-level sync: schedules one child per manual account and per item.
pub struct FamilySyncHandler {
    accounts: Arc<dyn AccountRepositoryTrait>,
    items: Arc<dyn LinkedItemRepositoryTrait>,
    scheduler: Arc<SyncScheduler>,
    transfers: Arc<TransferService>,
}

impl FamilySyncHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        items: Arc<dyn LinkedItemRepositoryTrait>,
        scheduler: Arc<SyncScheduler>,
        transfers: Arc<TransferService>,
    ) -> Self {
        Self {
            accounts,
            items,
            scheduler,
            transfers,
        }
    }
}

#[async_trait]
impl SyncHandler for FamilySyncHandler {
    async fn sync_data(&self, record: &SyncRecord) -> Result<()> {
        let SyncTarget::Family(family_id) = &record.target else {
            return Err(unexpected_target("Family", record));
        };

        let manual_accounts: Vec<_> = self
            .accounts
            .list_for_family(family_id, Some(true))?
            .into_iter()
            .filter(|account| account.is_manual())
            .collect();
        let mut scheduled_accounts = 0;
        for account in &manual_accounts {
            match self
                .scheduler
                .sync_later(
                    SyncTarget::Account(account.id.clone()),
                    record.window,
                    Some(record.id.clone()),
                )
                .await
            {
                Ok(_) => scheduled_accounts += 1,
                Err(e) => warn!(
                    "Failed to schedule sync for account {} of family {}: {}",
                    account.id, family_id, e
                ),
            }
        }

        let items = self.items.list_for_family(family_id)?;
        let mut scheduled_items = 0;
        for item in &items {
            if item.requires_update() {
                info!(
                    "Skipping item {} of family {}: reconnect required",
                    item.id, family_id
                );
                continue;
            }
            match self
                .scheduler
                .sync_later(
                    SyncTarget::Item(item.id.clone()),
                    record.window,
                    Some(record.id.clone()),
                )
                .await
            {
                Ok(_) => scheduled_items += 1,
                Err(e) => warn!(
                    "Failed to schedule sync for item {} of family {}: {}",
                    item.id, family_id, e
                ),
            }
        }

        debug!(
            "Family {} fanned out to {} manual accounts and {} items",
            family_id,
            scheduled_accounts,
            scheduled_items
        );
        Ok(())
    }

    async fn post_sync(&self, record: &SyncRecord) -> Result<()> {
        self.transfers
            .auto_match_transfers(record.target.id())
            .await
            .map(|_| ())
    }
}

/// Linked item sync: runs the import, then schedules balance recomputation
/// for every imported account.
pub struct ItemSyncHandler {
    items: Arc<dyn LinkedItemRepositoryTrait>,
    pipeline: Arc<ImportPipeline>,
    scheduler: Arc<SyncScheduler>,
    transfers: Arc<TransferService>,
}

impl ItemSyncHandler {
    pub fn new(
        items: Arc<dyn LinkedItemRepositoryTrait>,
        pipeline: Arc<ImportPipeline>,
        scheduler: Arc<SyncScheduler>,
        transfers: Arc<TransferService>,
    ) -> Self {
        Self {
            items,
            pipeline,
            scheduler,
            transfers,
        }
    }
}

#[async_trait]
impl SyncHandler for ItemSyncHandler {
    async fn sync_data(&self, record: &SyncRecord) -> Result<()> {
        let SyncTarget::Item(item_id) = &record.target else {
            return Err(unexpected_target("Item", record));
        };
        let item = self.items.get_by_id(item_id)?;
        let summary = self.pipeline.import(&item, &record.window).await?;

        for account_id in &summary.account_ids {
            if let Err(e) = self
                .scheduler
                .sync_later(
                    SyncTarget::Account(account_id.clone()),
                    record.window,
                    Some(record.id.clone()),
                )
                .await
            {
                warn!(
                    "Failed to schedule sync for account {} of item {}: {}",
                    account_id, item_id, e
                );
            }
        }
        Ok(())
    }

    async fn post_sync(&self, record: &SyncRecord) -> Result<()> {
        let item = self.items.get_by_id(record.target.id())?;
        self.transfers
            .auto_match_transfers(&item.family_id)
            .await
            .map(|_| ())
    }
}

/// Account sync: recomputes the daily balance series for the window.
pub struct AccountSyncHandler {
    accounts: Arc<dyn AccountRepositoryTrait>,
    entries: Arc<dyn EntryRepositoryTrait>,
    investments: Arc<dyn InvestmentRepositoryTrait>,
    balances: Arc<dyn BalanceRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl AccountSyncHandler {
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        entries: Arc<dyn EntryRepositoryTrait>,
        investments: Arc<dyn InvestmentRepositoryTrait>,
        balances: Arc<dyn BalanceRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            accounts,
            entries,
            investments,
            balances,
            event_sink,
        }
    }

    async fn recompute(&self, account_id: &str, window: &SyncWindow) -> Result<()> {
        let account = self.accounts.get_by_id(account_id)?;
        let entries = self.entries.list_for_account(account_id)?;
        let holdings = self.investments.list_holdings(account_id)?;

        let end = window.end_date.unwrap_or_else(today_utc);
        let series =
            BalanceCalculator::new(&account, &entries, &holdings).calculate(window.start_date, end);

        let Some(latest) = series.last().cloned() else {
            warn!("No balances computed for account {}", account_id);
            return Ok(());
        };
        let count = self.balances.upsert_balances(series).await?;
        self.accounts
            .update_balances(account_id, latest.balance, latest.cash_balance)
            .await?;
        debug!("Stored {} daily balances for account {}", count, account_id);
        Ok(())
    }
}

#[async_trait]
impl SyncHandler for AccountSyncHandler {
    async fn sync_data(&self, record: &SyncRecord) -> Result<()> {
        let SyncTarget::Account(account_id) = &record.target else {
            return Err(unexpected_target("Account", record));
        };
        self.recompute(account_id, &record.window).await
    }

    async fn post_sync(&self, record: &SyncRecord) -> Result<()> {
        self.event_sink.emit(DomainEvent::account_balances_updated(
            record.target.id().to_string(),
        ));
        Ok(())
    }
}
