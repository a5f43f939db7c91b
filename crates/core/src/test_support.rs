//! In-memory repositories and provider used by the core unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::accounts::{Account, AccountRepositoryTrait, NewAccount};
use crate::balances::{BalanceRepositoryTrait, DailyBalance};
use crate::entries::{Entry, EntryKind, EntryRepositoryTrait, NewEntry, UpsertSummary};
use crate::errors::{DatabaseError, Error, Result};
use crate::families::{Family, FamilyRepositoryTrait, NewFamily};
use crate::investments::{Holding, InvestmentRepositoryTrait, NewHolding, NewSecurity, Security};
use crate::items::{
    InstitutionDetails, LinkedItem, LinkedItemRepositoryTrait, LinkedItemStatus, NewLinkedItem,
};
use crate::providers::{
    DateRange, InvestmentsSnapshot, LiabilitiesSnapshot, Product, ProviderAccount, ProviderClient,
    ProviderError, ProviderInstitution, ProviderItem, PublicTokenExchange, TransactionsPage,
};
use crate::sync::{
    NewSyncRecord, SyncQueue, SyncRecord, SyncRecordRepositoryTrait, SyncStatus, SyncTarget,
};
use crate::transfers::{
    plan_transfer_matches, RejectedPair, Transfer, TransferCandidate, TransferMatchConfig,
    TransferRepositoryTrait, TransferStatus,
};
use crate::webhooks::WebhookError;

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[derive(Default)]
pub struct StoreState {
    pub families: Vec<Family>,
    pub items: Vec<LinkedItem>,
    pub accounts: Vec<Account>,
    pub entries: Vec<Entry>,
    pub securities: Vec<Security>,
    pub holdings: Vec<Holding>,
    pub balances: Vec<DailyBalance>,
    pub sync_records: Vec<SyncRecord>,
    pub transfers: Vec<Transfer>,
    pub rejected: Vec<RejectedPair>,
    /// When set, entry upserts fail without writing.
    pub fail_entry_upserts: bool,
    /// Target ids whose sync records cannot be created.
    pub fail_sync_records_for: Vec<String>,
}

/// Implements every repository trait over one shared state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap()
    }

    pub fn add_family(&self, id: &str) -> Family {
        let family = Family {
            id: id.to_string(),
            name: format!("Family {}", id),
            currency: "USD".to_string(),
            created_at: now(),
            updated_at: now(),
        };
        self.state().families.push(family.clone());
        family
    }

    pub fn add_account(&self, account: Account) -> Account {
        self.state().accounts.push(account.clone());
        account
    }

    pub fn add_item(&self, item: LinkedItem) -> LinkedItem {
        self.state().items.push(item.clone());
        item
    }

    pub fn add_entry(&self, entry: Entry) -> Entry {
        self.state().entries.push(entry.clone());
        entry
    }

    /// Inserts a record as-is, letting tests pick its age and status.
    pub fn add_sync_record(&self, record: SyncRecord) -> SyncRecord {
        self.state().sync_records.push(record.clone());
        record
    }

    pub fn item(&self, item_id: &str) -> LinkedItem {
        self.state()
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
            .unwrap()
    }

    pub fn account_by_external_id(&self, external_id: &str) -> Account {
        self.state()
            .accounts
            .iter()
            .find(|a| a.external_id.as_deref() == Some(external_id))
            .cloned()
            .unwrap()
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.state().entries.clone()
    }

    pub fn sync_records(&self) -> Vec<SyncRecord> {
        self.state().sync_records.clone()
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.state().transfers.clone()
    }
}

#[async_trait]
impl FamilyRepositoryTrait for InMemoryStore {
    async fn create(&self, new_family: NewFamily) -> Result<Family> {
        new_family.validate()?;
        let family = Family {
            id: new_family.id.unwrap_or_else(new_id),
            name: new_family.name,
            currency: new_family.currency,
            created_at: now(),
            updated_at: now(),
        };
        self.state().families.push(family.clone());
        Ok(family)
    }

    fn get_by_id(&self, family_id: &str) -> Result<Family> {
        self.state()
            .families
            .iter()
            .find(|f| f.id == family_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Family", family_id))
    }

    fn list(&self) -> Result<Vec<Family>> {
        Ok(self.state().families.clone())
    }
}

#[async_trait]
impl LinkedItemRepositoryTrait for InMemoryStore {
    async fn create(&self, new_item: NewLinkedItem) -> Result<LinkedItem> {
        let mut state = self.state();
        if state.items.iter().any(|i| i.external_id == new_item.external_id) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                new_item.external_id,
            )));
        }
        let item = LinkedItem {
            id: new_id(),
            family_id: new_item.family_id,
            provider: new_item.provider,
            external_id: new_item.external_id,
            access_token: new_item.access_token,
            name: new_item.name,
            created_at: now(),
            updated_at: now(),
            ..Default::default()
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update_status(&self, item_id: &str, status: LinkedItemStatus) -> Result<()> {
        self.with_item(item_id, |item| item.status = status)
    }

    async fn update_products(
        &self,
        item_id: &str,
        products: Vec<Product>,
        institution_id: Option<String>,
    ) -> Result<()> {
        self.with_item(item_id, |item| {
            item.products = products;
            item.institution_id = institution_id;
        })
    }

    async fn update_institution(&self, item_id: &str, details: InstitutionDetails) -> Result<()> {
        self.with_item(item_id, |item| {
            item.institution_url = details.url;
            item.logo_url = details.logo_url;
            item.brand_color = details.brand_color;
        })
    }

    async fn update_cursor(&self, item_id: &str, cursor: String) -> Result<()> {
        self.with_item(item_id, |item| item.cursor = Some(cursor))
    }

    async fn update_credentials(&self, item_id: &str, access_token: String) -> Result<()> {
        self.with_item(item_id, |item| {
            item.access_token = access_token;
            item.status = LinkedItemStatus::Good;
        })
    }

    async fn delete(&self, item_id: &str) -> Result<usize> {
        let mut state = self.state();
        let before = state.items.len();
        state.items.retain(|i| i.id != item_id);
        let removed = before - state.items.len();
        let account_ids: HashSet<String> = state
            .accounts
            .iter()
            .filter(|a| a.linked_item_id.as_deref() == Some(item_id))
            .map(|a| a.id.clone())
            .collect();
        state.accounts.retain(|a| !account_ids.contains(&a.id));
        state.entries.retain(|e| !account_ids.contains(&e.account_id));
        Ok(removed)
    }

    fn get_by_id(&self, item_id: &str) -> Result<LinkedItem> {
        self.state()
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
            .ok_or_else(|| Error::not_found("LinkedItem", item_id))
    }

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<LinkedItem>> {
        Ok(self
            .state()
            .items
            .iter()
            .find(|i| i.external_id == external_id)
            .cloned())
    }

    fn list_for_family(&self, family_id: &str) -> Result<Vec<LinkedItem>> {
        Ok(self
            .state()
            .items
            .iter()
            .filter(|i| i.family_id == family_id)
            .cloned()
            .collect())
    }
}

impl InMemoryStore {
    pub fn with_item(&self, item_id: &str, update: impl FnOnce(&mut LinkedItem)) -> Result<()> {
        let mut state = self.state();
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| Error::not_found("LinkedItem", item_id))?;
        update(item);
        item.updated_at = now();
        Ok(())
    }

    fn with_account(&self, account_id: &str, update: impl FnOnce(&mut Account)) -> Result<()> {
        let mut state = self.state();
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| Error::not_found("Account", account_id))?;
        update(account);
        account.updated_at = now();
        Ok(())
    }
}

fn account_from_new(new_account: NewAccount) -> Account {
    Account {
        id: new_account.id.unwrap_or_else(new_id),
        family_id: new_account.family_id,
        linked_item_id: new_account.linked_item_id,
        external_id: new_account.external_id,
        name: new_account.name,
        account_type: new_account.account_type,
        subtype: new_account.subtype,
        classification: new_account.classification,
        currency: new_account.currency,
        balance: new_account.balance,
        cash_balance: new_account.balance,
        is_active: new_account.is_active,
        meta: new_account.meta,
        created_at: now(),
        updated_at: now(),
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let account = account_from_new(new_account);
        self.state().accounts.push(account.clone());
        Ok(account)
    }

    async fn upsert_linked(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        let mut state = self.state();
        let existing = state.accounts.iter_mut().find(|a| {
            a.linked_item_id == new_account.linked_item_id
                && a.external_id == new_account.external_id
        });
        if let Some(account) = existing {
            account.name = new_account.name;
            account.account_type = new_account.account_type;
            account.subtype = new_account.subtype;
            account.classification = new_account.classification;
            account.currency = new_account.currency;
            account.balance = new_account.balance;
            account.updated_at = now();
            return Ok(account.clone());
        }
        let account = account_from_new(new_account);
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn update_balances(
        &self,
        account_id: &str,
        balance: Decimal,
        cash_balance: Decimal,
    ) -> Result<()> {
        self.with_account(account_id, |account| {
            account.balance = balance;
            account.cash_balance = cash_balance;
        })
    }

    async fn update_meta(&self, account_id: &str, meta: String) -> Result<()> {
        self.with_account(account_id, |account| account.meta = Some(meta))
    }

    async fn set_active(&self, account_id: &str, is_active: bool) -> Result<()> {
        self.with_account(account_id, |account| account.is_active = is_active)
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.state()
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Account", account_id))
    }

    fn list_for_family(
        &self,
        family_id: &str,
        is_active_filter: Option<bool>,
    ) -> Result<Vec<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .filter(|a| a.family_id == family_id)
            .filter(|a| is_active_filter.map_or(true, |active| a.is_active == active))
            .cloned()
            .collect())
    }

    fn list_for_item(&self, linked_item_id: &str) -> Result<Vec<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .filter(|a| a.linked_item_id.as_deref() == Some(linked_item_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EntryRepositoryTrait for InMemoryStore {
    async fn create(&self, new_entry: NewEntry) -> Result<Entry> {
        new_entry.validate()?;
        let entry = Entry {
            id: new_id(),
            account_id: new_entry.account_id,
            external_id: new_entry.external_id,
            date: new_entry.date,
            name: new_entry.name,
            amount: new_entry.amount,
            currency: new_entry.currency,
            payload: new_entry.payload,
            created_at: now(),
            updated_at: now(),
        };
        self.state().entries.push(entry.clone());
        Ok(entry)
    }

    async fn upsert_entries(&self, entries: Vec<NewEntry>) -> Result<UpsertSummary> {
        let mut state = self.state();
        if state.fail_entry_upserts {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "entry upsert failed".to_string(),
            )));
        }
        let mut summary = UpsertSummary::default();
        for new_entry in entries {
            let existing = new_entry.external_id.as_ref().and_then(|external_id| {
                state.entries.iter_mut().find(|e| {
                    e.account_id == new_entry.account_id
                        && e.external_id.as_ref() == Some(external_id)
                })
            });
            match existing {
                Some(entry) => {
                    entry.date = new_entry.date;
                    entry.name = new_entry.name;
                    entry.amount = new_entry.amount;
                    entry.currency = new_entry.currency;
                    entry.payload = new_entry.payload;
                    entry.updated_at = now();
                    summary.updated += 1;
                }
                None => {
                    state.entries.push(Entry {
                        id: new_id(),
                        account_id: new_entry.account_id,
                        external_id: new_entry.external_id,
                        date: new_entry.date,
                        name: new_entry.name,
                        amount: new_entry.amount,
                        currency: new_entry.currency,
                        payload: new_entry.payload,
                        created_at: now(),
                        updated_at: now(),
                    });
                    summary.inserted += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn delete_by_external_ids(
        &self,
        account_ids: Vec<String>,
        external_ids: Vec<String>,
    ) -> Result<usize> {
        let mut state = self.state();
        let before = state.entries.len();
        state.entries.retain(|e| {
            !(account_ids.contains(&e.account_id)
                && e.external_id
                    .as_ref()
                    .is_some_and(|id| external_ids.contains(id)))
        });
        Ok(before - state.entries.len())
    }

    fn get_by_id(&self, entry_id: &str) -> Result<Entry> {
        self.state()
            .entries
            .iter()
            .find(|e| e.id == entry_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Entry", entry_id))
    }

    fn list_for_account(&self, account_id: &str) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .state()
            .entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(entries)
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryStore {
    async fn upsert_securities(&self, securities: Vec<NewSecurity>) -> Result<Vec<Security>> {
        let mut state = self.state();
        let mut result: Vec<Security> = Vec::new();
        for new_security in securities {
            if result
                .iter()
                .any(|s| s.provider_security_id == new_security.provider_security_id)
            {
                continue;
            }
            let existing = state
                .securities
                .iter()
                .find(|s| s.provider_security_id == new_security.provider_security_id)
                .cloned();
            let security = match existing {
                Some(security) => security,
                None => {
                    let security = Security {
                        id: new_id(),
                        provider_security_id: new_security.provider_security_id,
                        ticker: new_security.ticker,
                        name: new_security.name,
                        currency: new_security.currency,
                        security_type: new_security.security_type,
                        created_at: now(),
                        updated_at: now(),
                    };
                    state.securities.push(security.clone());
                    security
                }
            };
            result.push(security);
        }
        Ok(result)
    }

    async fn upsert_holdings(&self, holdings: Vec<NewHolding>) -> Result<UpsertSummary> {
        let mut state = self.state();
        let mut summary = UpsertSummary::default();
        for new_holding in holdings {
            let existing = state.holdings.iter_mut().find(|h| {
                h.account_id == new_holding.account_id
                    && h.security_id == new_holding.security_id
                    && h.date == new_holding.date
            });
            match existing {
                Some(holding) => {
                    holding.quantity = new_holding.quantity;
                    holding.price = new_holding.price;
                    holding.amount = new_holding.amount;
                    holding.currency = new_holding.currency;
                    summary.updated += 1;
                }
                None => {
                    state.holdings.push(Holding {
                        id: new_id(),
                        account_id: new_holding.account_id,
                        security_id: new_holding.security_id,
                        date: new_holding.date,
                        quantity: new_holding.quantity,
                        price: new_holding.price,
                        amount: new_holding.amount,
                        currency: new_holding.currency,
                    });
                    summary.inserted += 1;
                }
            }
        }
        Ok(summary)
    }

    fn list_holdings(&self, account_id: &str) -> Result<Vec<Holding>> {
        Ok(self
            .state()
            .holdings
            .iter()
            .filter(|h| h.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BalanceRepositoryTrait for InMemoryStore {
    async fn upsert_balances(&self, balances: Vec<DailyBalance>) -> Result<usize> {
        let mut state = self.state();
        let count = balances.len();
        for balance in balances {
            state
                .balances
                .retain(|b| !(b.account_id == balance.account_id && b.date == balance.date));
            state.balances.push(balance);
        }
        Ok(count)
    }

    fn list_balances(&self, account_id: &str) -> Result<Vec<DailyBalance>> {
        let mut balances: Vec<DailyBalance> = self
            .state()
            .balances
            .iter()
            .filter(|b| b.account_id == account_id)
            .cloned()
            .collect();
        balances.sort_by_key(|b| b.date);
        Ok(balances)
    }
}

#[async_trait]
impl SyncRecordRepositoryTrait for InMemoryStore {
    async fn create(&self, new_record: NewSyncRecord) -> Result<SyncRecord> {
        if self
            .state()
            .fail_sync_records_for
            .iter()
            .any(|id| id == new_record.target.id())
        {
            return Err(Error::Unexpected(format!(
                "cannot create sync record for {}",
                new_record.target
            )));
        }
        let record = SyncRecord {
            id: new_id(),
            target: new_record.target,
            status: SyncStatus::Pending,
            parent_id: new_record.parent_id,
            window: new_record.window,
            error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state().sync_records.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: SyncStatus,
        error: Option<String>,
    ) -> Result<SyncRecord> {
        let mut state = self.state();
        let record = state
            .sync_records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::not_found("SyncRecord", record_id))?;
        record.status = status;
        record.error = error;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn get_by_id(&self, record_id: &str) -> Result<SyncRecord> {
        self.state()
            .sync_records
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
            .ok_or_else(|| Error::not_found("SyncRecord", record_id))
    }

    fn find_active_for_target(
        &self,
        target: &SyncTarget,
        since: DateTime<Utc>,
    ) -> Result<Option<SyncRecord>> {
        Ok(self
            .state()
            .sync_records
            .iter()
            .filter(|r| &r.target == target && r.status.is_active() && r.created_at >= since)
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    fn count_active_since(&self, targets: &[SyncTarget], since: DateTime<Utc>) -> Result<usize> {
        Ok(self
            .state()
            .sync_records
            .iter()
            .filter(|r| targets.contains(&r.target))
            .filter(|r| r.status.is_active() && r.created_at >= since)
            .count())
    }
}

#[async_trait]
impl TransferRepositoryTrait for InMemoryStore {
    async fn auto_match(
        &self,
        family_id: &str,
        config: TransferMatchConfig,
    ) -> Result<Vec<Transfer>> {
        let mut state = self.state();
        let accounts: HashSet<&str> = state
            .accounts
            .iter()
            .filter(|a| a.family_id == family_id && a.is_active)
            .map(|a| a.id.as_str())
            .collect();
        let linked: HashSet<&str> = state
            .transfers
            .iter()
            .flat_map(|t| [t.inflow_entry_id.as_str(), t.outflow_entry_id.as_str()])
            .collect();
        let candidates: Vec<TransferCandidate> = state
            .entries
            .iter()
            .filter(|e| accounts.contains(e.account_id.as_str()))
            .filter(|e| e.kind() == EntryKind::Transaction)
            .filter(|e| !linked.contains(e.id.as_str()))
            .map(|e| TransferCandidate {
                entry_id: e.id.clone(),
                account_id: e.account_id.clone(),
                date: e.date,
                amount: e.amount,
                currency: e.currency.clone(),
                kind: e.kind(),
            })
            .collect();
        let rejected: HashSet<RejectedPair> = state.rejected.iter().cloned().collect();

        let planned = plan_transfer_matches(&candidates, &rejected, &config);
        let created: Vec<Transfer> = planned
            .into_iter()
            .map(|t| Transfer {
                id: new_id(),
                inflow_entry_id: t.inflow_entry_id,
                outflow_entry_id: t.outflow_entry_id,
                status: t.status,
                created_at: now(),
                updated_at: now(),
            })
            .collect();
        state.transfers.extend(created.iter().cloned());
        Ok(created)
    }

    async fn confirm(&self, transfer_id: &str) -> Result<Transfer> {
        let mut state = self.state();
        let transfer = state
            .transfers
            .iter_mut()
            .find(|t| t.id == transfer_id)
            .ok_or_else(|| Error::not_found("Transfer", transfer_id))?;
        transfer.status = TransferStatus::Confirmed;
        Ok(transfer.clone())
    }

    async fn reject(&self, transfer_id: &str) -> Result<RejectedPair> {
        let mut state = self.state();
        let position = state
            .transfers
            .iter()
            .position(|t| t.id == transfer_id)
            .ok_or_else(|| Error::not_found("Transfer", transfer_id))?;
        let transfer = state.transfers.remove(position);
        let pair = RejectedPair {
            inflow_entry_id: transfer.inflow_entry_id,
            outflow_entry_id: transfer.outflow_entry_id,
        };
        state.rejected.push(pair.clone());
        Ok(pair)
    }

    fn get_by_id(&self, transfer_id: &str) -> Result<Transfer> {
        self.state()
            .transfers
            .iter()
            .find(|t| t.id == transfer_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Transfer", transfer_id))
    }

    fn list_for_family(&self, family_id: &str) -> Result<Vec<Transfer>> {
        let state = self.state();
        let account_ids: HashSet<&str> = state
            .accounts
            .iter()
            .filter(|a| a.family_id == family_id)
            .map(|a| a.id.as_str())
            .collect();
        let entry_accounts: HashMap<&str, &str> = state
            .entries
            .iter()
            .map(|e| (e.id.as_str(), e.account_id.as_str()))
            .collect();
        Ok(state
            .transfers
            .iter()
            .filter(|t| {
                entry_accounts
                    .get(t.inflow_entry_id.as_str())
                    .is_some_and(|account_id| account_ids.contains(account_id))
            })
            .cloned()
            .collect())
    }
}

/// Queue that only records submissions.
#[derive(Clone, Default)]
pub struct RecordingQueue {
    submitted: Arc<Mutex<Vec<String>>>,
}

impl RecordingQueue {
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

impl SyncQueue for RecordingQueue {
    fn submit(&self, record_id: &str) -> Result<()> {
        self.submitted.lock().unwrap().push(record_id.to_string());
        Ok(())
    }
}

/// Scripted provider responses.
#[derive(Default)]
pub struct MockProviderState {
    pub item: Option<ProviderItem>,
    pub item_error: Option<ProviderError>,
    pub institution: Option<ProviderInstitution>,
    pub accounts: Vec<ProviderAccount>,
    /// Transaction pages keyed by the cursor they are requested with.
    pub pages: HashMap<Option<String>, std::result::Result<TransactionsPage, ProviderError>>,
    pub investments: InvestmentsSnapshot,
    pub liabilities: LiabilitiesSnapshot,
    pub webhook_error: Option<WebhookError>,
    pub requested_cursors: Vec<Option<String>>,
    pub removed_tokens: Vec<String>,
    /// Upstream item id returned by every token exchange, when set.
    pub exchange_item_id: Option<String>,
}

#[derive(Clone)]
pub struct MockProviderClient {
    name: String,
    state: Arc<Mutex<MockProviderState>>,
}

impl MockProviderClient {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(MockProviderState::default())),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockProviderState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<PublicTokenExchange> {
        let item_id = self
            .state()
            .exchange_item_id
            .clone()
            .unwrap_or_else(|| format!("item-for-{}", public_token));
        Ok(PublicTokenExchange {
            item_id,
            access_token: format!("access-{}", public_token),
        })
    }

    async fn get_item(&self, _access_token: &str) -> Result<ProviderItem> {
        let state = self.state();
        if let Some(err) = &state.item_error {
            return Err(err.clone().into());
        }
        state
            .item
            .clone()
            .ok_or_else(|| ProviderError::from_response(Some(400), "ITEM_NOT_FOUND", "no item").into())
    }

    async fn get_institution(&self, institution_id: &str) -> Result<ProviderInstitution> {
        self.state().institution.clone().ok_or_else(|| {
            ProviderError::from_response(Some(404), "INSTITUTION_NOT_FOUND", institution_id).into()
        })
    }

    async fn get_accounts(&self, _access_token: &str) -> Result<Vec<ProviderAccount>> {
        Ok(self.state().accounts.clone())
    }

    async fn get_transactions(
        &self,
        _access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsPage> {
        let mut state = self.state();
        let key = cursor.map(str::to_string);
        state.requested_cursors.push(key.clone());
        match state.pages.get(&key) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(err)) => Err(err.clone().into()),
            None => Ok(TransactionsPage {
                next_cursor: cursor.unwrap_or_default().to_string(),
                has_more: false,
                ..Default::default()
            }),
        }
    }

    async fn get_investments(
        &self,
        _access_token: &str,
        _window: DateRange,
    ) -> Result<InvestmentsSnapshot> {
        Ok(self.state().investments.clone())
    }

    async fn get_liabilities(&self, _access_token: &str) -> Result<LiabilitiesSnapshot> {
        Ok(self.state().liabilities.clone())
    }

    async fn remove_item(&self, access_token: &str) -> Result<()> {
        self.state().removed_tokens.push(access_token.to_string());
        Ok(())
    }

    async fn validate_webhook(&self, _signature_header: &str, _raw_body: &str) -> Result<()> {
        match &self.state().webhook_error {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }
}
