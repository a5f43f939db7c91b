//! Imports one linked item's provider snapshot.
//!
//! Stages run in a fixed order: item metadata, institution branding, accounts,
//! then the per-product imports. Every write is an upsert keyed on the
//! provider's identifiers, so re-running an import converges.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Duration;
use log::{debug, info, warn};

use super::import_mapping::{
    collect_securities, credit_details, map_account, map_holding, map_investment_transaction,
    map_transaction, mortgage_details, student_loan_details,
};
use super::import_model::ImportSummary;
use crate::accounts::{set_liability_details, Account, AccountRepositoryTrait, LiabilityDetails};
use crate::entries::{EntryRepositoryTrait, NewEntry, UpsertSummary};
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::investments::InvestmentRepositoryTrait;
use crate::items::{InstitutionDetails, LinkedItem, LinkedItemRepositoryTrait, LinkedItemStatus};
use crate::providers::{
    DateRange, Product, ProviderClient, ProviderRegistry, ProviderTransaction, TransactionsPage,
};
use crate::sync::{SyncConfig, SyncWindow};
use crate::utils::time_utils::today_utc;

/// Accounts of the item keyed by provider account id.
type AccountsByExternalId = HashMap<String, Account>;

/// Net effect of the drained transaction pages, folded in page order.
#[derive(Default)]
struct TransactionDelta {
    upserts: HashMap<String, ProviderTransaction>,
    removed: HashSet<String>,
}

impl TransactionDelta {
    /// A later page wins over an earlier one for the same transaction id.
    fn apply(&mut self, page: TransactionsPage) {
        for transaction in page.added.into_iter().chain(page.modified) {
            self.removed.remove(&transaction.transaction_id);
            self.upserts.insert(transaction.transaction_id.clone(), transaction);
        }
        for removed in page.removed {
            self.upserts.remove(&removed.transaction_id);
            self.removed.insert(removed.transaction_id);
        }
    }
}

pub struct ImportPipeline {
    providers: Arc<ProviderRegistry>,
    items: Arc<dyn LinkedItemRepositoryTrait>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    entries: Arc<dyn EntryRepositoryTrait>,
    investments: Arc<dyn InvestmentRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    config: SyncConfig,
}

impl ImportPipeline {
    pub fn new(
        providers: Arc<ProviderRegistry>,
        items: Arc<dyn LinkedItemRepositoryTrait>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        entries: Arc<dyn EntryRepositoryTrait>,
        investments: Arc<dyn InvestmentRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        config: SyncConfig,
    ) -> Self {
        Self {
            providers,
            items,
            accounts,
            entries,
            investments,
            event_sink,
            config,
        }
    }

    /// Imports the item's current provider snapshot.
    ///
    /// A re-authentication error flips the item to `requires_update` before it
    /// is returned. Every other error is returned as is.
    pub async fn import(&self, item: &LinkedItem, window: &SyncWindow) -> Result<ImportSummary> {
        match self.run(item, window).await {
            Ok(summary) => Ok(summary),
            Err(err) => {
                if err.as_provider_error().is_some_and(|e| e.requires_reauth()) {
                    warn!(
                        "Item {} requires re-authentication; marking as requires_update",
                        item.id
                    );
                    match self
                        .items
                        .update_status(&item.id, LinkedItemStatus::RequiresUpdate)
                        .await
                    {
                        Ok(()) => self
                            .event_sink
                            .emit(DomainEvent::linked_item_requires_update(item.id.clone())),
                        Err(e) => warn!("Failed to update status of item {}: {}", item.id, e),
                    }
                }
                Err(err)
            }
        }
    }

    async fn run(&self, item: &LinkedItem, window: &SyncWindow) -> Result<ImportSummary> {
        let provider = self.providers.get(&item.provider)?;
        let token = item.access_token.as_str();

        // 1. Item metadata. Without the product list nothing else can run.
        let provider_item = provider.get_item(token).await?;
        self.items
            .update_products(
                &item.id,
                provider_item.products.clone(),
                provider_item.institution_id.clone(),
            )
            .await?;
        let products = provider_item.products;

        // 2. Institution branding, cosmetic only.
        if let Some(institution_id) = provider_item.institution_id.as_deref() {
            self.import_institution(provider.as_ref(), item, institution_id)
                .await;
        }

        // 3. Accounts.
        let accounts = self.import_accounts(provider.as_ref(), item).await?;
        let mut summary = ImportSummary {
            account_ids: accounts.values().map(|a| a.id.clone()).collect(),
            ..Default::default()
        };
        summary.account_ids.sort();

        // 4. Products the item supports.
        if products.contains(&Product::Transactions) {
            let (upserted, removed) = self
                .import_transactions(provider.as_ref(), item, &accounts)
                .await?;
            summary.entries.merge(upserted);
            summary.entries_removed = removed;
        }
        if products.contains(&Product::Investments) {
            self.import_investments(provider.as_ref(), item, &accounts, window, &mut summary)
                .await?;
        }
        if products.contains(&Product::Liabilities) {
            summary.liabilities = self
                .import_liabilities(provider.as_ref(), item, &accounts)
                .await?;
        }

        info!(
            "Imported item {}: {} accounts, {} new / {} updated / {} removed entries",
            item.id,
            summary.account_ids.len(),
            summary.entries.inserted,
            summary.entries.updated,
            summary.entries_removed
        );
        Ok(summary)
    }

    async fn import_institution(
        &self,
        provider: &dyn ProviderClient,
        item: &LinkedItem,
        institution_id: &str,
    ) {
        let institution = match provider.get_institution(institution_id).await {
            Ok(institution) => institution,
            Err(e) => {
                warn!(
                    "Failed to fetch institution {} for item {}: {}",
                    institution_id, item.id, e
                );
                return;
            }
        };
        let details = InstitutionDetails {
            name: Some(institution.name),
            url: institution.url,
            logo_url: institution.logo_url,
            brand_color: institution.brand_color,
        };
        if let Err(e) = self.items.update_institution(&item.id, details).await {
            warn!("Failed to store institution for item {}: {}", item.id, e);
        }
    }

    async fn import_accounts(
        &self,
        provider: &dyn ProviderClient,
        item: &LinkedItem,
    ) -> Result<AccountsByExternalId> {
        let provider_accounts = provider.get_accounts(item.access_token.as_str()).await?;
        let mut accounts = AccountsByExternalId::with_capacity(provider_accounts.len());
        for provider_account in &provider_accounts {
            let account = self
                .accounts
                .upsert_linked(map_account(item, provider_account))
                .await?;
            accounts.insert(provider_account.account_id.clone(), account);
        }
        debug!("Upserted {} accounts for item {}", accounts.len(), item.id);
        Ok(accounts)
    }

    /// Drains every page since the stored cursor, applies the delta, and only
    /// then stores the new cursor.
    async fn import_transactions(
        &self,
        provider: &dyn ProviderClient,
        item: &LinkedItem,
        accounts: &AccountsByExternalId,
    ) -> Result<(UpsertSummary, usize)> {
        let mut cursor = item.cursor.clone();
        let mut delta = TransactionDelta::default();
        let mut pages = 0;

        loop {
            let page = provider
                .get_transactions(item.access_token.as_str(), cursor.as_deref())
                .await?;
            pages += 1;
            let has_more = page.has_more;
            cursor = Some(page.next_cursor.clone());
            delta.apply(page);

            if !has_more {
                break;
            }
            if pages >= self.config.max_transaction_pages {
                warn!(
                    "Item {} still has more transaction pages after {}; continuing next sync",
                    item.id, pages
                );
                break;
            }
        }

        let account_ids: Vec<String> = accounts.values().map(|a| a.id.clone()).collect();
        let removed_ids: Vec<String> = delta.removed.into_iter().collect();
        let removed = if removed_ids.is_empty() {
            0
        } else {
            self.entries
                .delete_by_external_ids(account_ids, removed_ids)
                .await?
        };

        let mut pending: Vec<ProviderTransaction> = delta.upserts.into_values().collect();
        pending.sort_by(|a, b| a.transaction_id.cmp(&b.transaction_id));
        let new_entries: Vec<NewEntry> = pending
            .iter()
            .filter_map(|transaction| match accounts.get(&transaction.account_id) {
                Some(account) => Some(map_transaction(account, transaction)),
                None => {
                    warn!(
                        "Skipping transaction {} for unknown account {}",
                        transaction.transaction_id, transaction.account_id
                    );
                    None
                }
            })
            .collect();
        let upserted = if new_entries.is_empty() {
            UpsertSummary::default()
        } else {
            self.entries.upsert_entries(new_entries).await?
        };

        if let Some(next_cursor) = cursor {
            if item.cursor.as_deref() != Some(next_cursor.as_str()) {
                self.items.update_cursor(&item.id, next_cursor).await?;
            }
        }

        debug!("Applied {} transaction pages for item {}", pages, item.id);
        Ok((upserted, removed))
    }

    async fn import_investments(
        &self,
        provider: &dyn ProviderClient,
        item: &LinkedItem,
        accounts: &AccountsByExternalId,
        window: &SyncWindow,
        summary: &mut ImportSummary,
    ) -> Result<()> {
        let end = window.end_date.unwrap_or_else(today_utc);
        let start = window
            .start_date
            .unwrap_or(end - Duration::days(self.config.investments_lookback_days));
        let snapshot = provider
            .get_investments(item.access_token.as_str(), DateRange { start, end })
            .await?;

        let new_securities = collect_securities(&snapshot);
        let security_ids: HashMap<String, String> = if new_securities.is_empty() {
            HashMap::new()
        } else {
            self.investments
                .upsert_securities(new_securities)
                .await?
                .into_iter()
                .map(|s| (s.provider_security_id, s.id))
                .collect()
        };
        summary.securities = security_ids.len();

        let holdings: Vec<_> = snapshot
            .holdings
            .iter()
            .filter_map(|holding| {
                let account = accounts.get(&holding.account_id)?;
                let security_id = security_ids.get(&holding.security_id)?;
                Some(map_holding(account, holding, security_id, end))
            })
            .collect();
        if !holdings.is_empty() {
            summary
                .holdings
                .merge(self.investments.upsert_holdings(holdings).await?);
        }

        let entries: Vec<NewEntry> = snapshot
            .transactions
            .iter()
            .filter_map(|transaction| {
                let account = accounts.get(&transaction.account_id)?;
                Some(map_investment_transaction(account, transaction, &security_ids))
            })
            .collect();
        if !entries.is_empty() {
            summary
                .entries
                .merge(self.entries.upsert_entries(entries).await?);
        }
        Ok(())
    }

    async fn import_liabilities(
        &self,
        provider: &dyn ProviderClient,
        item: &LinkedItem,
        accounts: &AccountsByExternalId,
    ) -> Result<usize> {
        let snapshot = provider
            .get_liabilities(item.access_token.as_str())
            .await?;

        let details: Vec<(&str, LiabilityDetails)> = snapshot
            .credit
            .iter()
            .map(|l| (l.account_id.as_str(), credit_details(l)))
            .chain(
                snapshot
                    .mortgage
                    .iter()
                    .map(|l| (l.account_id.as_str(), mortgage_details(l))),
            )
            .chain(
                snapshot
                    .student
                    .iter()
                    .map(|l| (l.account_id.as_str(), student_loan_details(l))),
            )
            .collect();

        let mut stored = 0;
        for (external_id, liability) in details {
            let Some(account) = accounts.get(external_id) else {
                warn!(
                    "Skipping liability for unknown account {} on item {}",
                    external_id, item.id
                );
                continue;
            };
            let meta = set_liability_details(account.meta.as_deref(), &liability)?;
            self.accounts.update_meta(&account.id, meta).await?;
            stored += 1;
        }
        Ok(stored)
    }
}
