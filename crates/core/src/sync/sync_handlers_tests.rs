use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::accounts::{Account, AccountClassification};
use crate::balances::BalanceRepositoryTrait;
use crate::entries::{Entry, EntryPayload};
use crate::events::MockDomainEventSink;
use crate::import::ImportPipeline;
use crate::items::{LinkedItem, LinkedItemService, LinkedItemStatus};
use crate::providers::{
    Product, ProviderAccount, ProviderBalances, ProviderError, ProviderItem, ProviderRegistry,
    ProviderTransaction, TransactionsPage,
};
use crate::test_support::{InMemoryStore, MockProviderClient, RecordingQueue};
use crate::transfers::TransferService;

struct Engine {
    store: InMemoryStore,
    provider: MockProviderClient,
    queue: RecordingQueue,
    scheduler: Arc<SyncScheduler>,
    runner: SyncRunner,
}

impl Engine {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let provider = MockProviderClient::new("mock");
        let queue = RecordingQueue::default();
        let sink = Arc::new(MockDomainEventSink::new());
        let config = SyncConfig::default();

        let providers = Arc::new(ProviderRegistry::new().with_provider(Arc::new(provider.clone())));
        let scheduler = Arc::new(SyncScheduler::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(queue.clone()),
            config.clone(),
        ));
        let transfers = Arc::new(TransferService::new(Arc::new(store.clone()), sink.clone()));
        let pipeline = Arc::new(ImportPipeline::new(
            providers,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            sink.clone(),
            config,
        ));
        let handlers = SyncHandlers {
            family: Arc::new(FamilySyncHandler::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                scheduler.clone(),
                transfers.clone(),
            )),
            item: Arc::new(ItemSyncHandler::new(
                Arc::new(store.clone()),
                pipeline,
                scheduler.clone(),
                transfers,
            )),
            account: Arc::new(AccountSyncHandler::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                sink.clone(),
            )),
        };
        let runner = SyncRunner::new(Arc::new(store.clone()), handlers, sink);

        Engine {
            store,
            provider,
            queue,
            scheduler,
            runner,
        }
    }

    /// Executes submitted records in order until the queue is drained,
    /// standing in for the worker pool.
    async fn drain(&self) {
        let mut executed = 0;
        loop {
            let submitted = self.queue.submitted();
            if executed >= submitted.len() {
                break;
            }
            self.runner.execute(&submitted[executed]).await.unwrap();
            executed += 1;
        }
    }

    fn record_for(&self, target: &SyncTarget) -> SyncRecord {
        self.store
            .sync_records()
            .into_iter()
            .filter(|r| &r.target == target)
            .last()
            .unwrap()
    }
}

fn seed(engine: &Engine) {
    let store = &engine.store;
    store.add_family("fam-1");
    store.add_account(Account {
        id: "manual".to_string(),
        family_id: "fam-1".to_string(),
        name: "Wallet".to_string(),
        account_type: "depository".to_string(),
        currency: "USD".to_string(),
        is_active: true,
        ..Default::default()
    });
    store.add_entry(Entry {
        id: "wallet-cash".to_string(),
        account_id: "manual".to_string(),
        external_id: None,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        name: "Opening".to_string(),
        amount: dec!(300),
        currency: "USD".to_string(),
        payload: EntryPayload::Valuation,
        created_at: Default::default(),
        updated_at: Default::default(),
    });
    store.add_item(LinkedItem {
        id: "item-1".to_string(),
        family_id: "fam-1".to_string(),
        provider: "mock".to_string(),
        external_id: "ext-item-1".to_string(),
        access_token: "access-1".to_string(),
        ..Default::default()
    });

    let mut provider = engine.provider.state();
    provider.item = Some(ProviderItem {
        item_id: "ext-item-1".to_string(),
        institution_id: None,
        products: vec![Product::Transactions],
    });
    provider.accounts = ["depository", "credit"]
        .iter()
        .enumerate()
        .map(|(n, account_type)| ProviderAccount {
            account_id: format!("ext-{}", n),
            name: account_type.to_string(),
            official_name: None,
            mask: None,
            account_type: account_type.to_string(),
            subtype: None,
            balances: ProviderBalances {
                current: Some(dec!(1000)),
                available: None,
                iso_currency_code: Some("USD".to_string()),
            },
        })
        .collect();
    let txn = |id: &str, account_id: &str, day: u32, amount| ProviderTransaction {
        transaction_id: id.to_string(),
        account_id: account_id.to_string(),
        amount,
        iso_currency_code: Some("USD".to_string()),
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        name: id.to_string(),
        merchant_name: None,
        pending: false,
    };
    provider.pages.insert(
        None,
        Ok(TransactionsPage {
            added: vec![
                txn("card-payment-out", "ext-0", 10, dec!(250)),
                txn("card-payment-in", "ext-1", 12, dec!(-250)),
                txn("groceries", "ext-1", 11, dec!(80)),
            ],
            next_cursor: "c1".to_string(),
            has_more: false,
            ..Default::default()
        }),
    );
}

#[tokio::test]
async fn test_family_sync_fans_out_imports_and_matches_transfers() {
    let engine = Engine::new();
    seed(&engine);

    let family_record = engine
        .scheduler
        .sync_later(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();
    engine.drain().await;

    let records = engine.store.sync_records();
    // Family, manual account, item, two linked accounts.
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.status == SyncStatus::Completed));

    let item_record = engine.record_for(&SyncTarget::Item("item-1".to_string()));
    assert_eq!(item_record.parent_id.as_deref(), Some(family_record.id.as_str()));
    let card = engine.store.account_by_external_id("ext-1");
    assert_eq!(card.classification, AccountClassification::Liability);
    let card_record = engine.record_for(&SyncTarget::Account(card.id.clone()));
    assert_eq!(card_record.parent_id.as_deref(), Some(item_record.id.as_str()));

    let transfers = engine.store.transfers();
    assert_eq!(transfers.len(), 1);
    let inflow = engine
        .store
        .entries()
        .into_iter()
        .find(|e| e.id == transfers[0].inflow_entry_id)
        .unwrap();
    assert_eq!(inflow.external_id.as_deref(), Some("card-payment-in"));

    let wallet = engine
        .store
        .state()
        .accounts
        .iter()
        .find(|a| a.id == "manual")
        .cloned()
        .unwrap();
    assert_eq!(wallet.balance, dec!(300));
    let card_balances = BalanceRepositoryTrait::list_balances(&engine.store, &card.id).unwrap();
    assert_eq!(card_balances.last().map(|b| b.balance), Some(dec!(1000)));
    assert!(!engine.scheduler.is_family_syncing("fam-1").unwrap());
}

#[tokio::test]
async fn test_reauth_failure_stays_inside_the_item_record() {
    let engine = Engine::new();
    seed(&engine);
    engine.provider.state().item_error = Some(ProviderError::reauth_required("login expired"));

    engine
        .scheduler
        .sync_later(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();
    engine.drain().await;

    let item_record = engine.record_for(&SyncTarget::Item("item-1".to_string()));
    assert_eq!(item_record.status, SyncStatus::Failed);
    assert!(item_record.error.is_some());
    assert_eq!(
        engine.store.item("item-1").status,
        LinkedItemStatus::RequiresUpdate
    );

    let family_record = engine.record_for(&SyncTarget::Family("fam-1".to_string()));
    assert_eq!(family_record.status, SyncStatus::Completed);
    let manual_record = engine.record_for(&SyncTarget::Account("manual".to_string()));
    assert_eq!(manual_record.status, SyncStatus::Completed);

    // A later family sync leaves the item alone until it is reconnected.
    engine
        .scheduler
        .enqueue(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();
    engine.drain().await;
    let item_records = engine
        .store
        .sync_records()
        .into_iter()
        .filter(|r| r.target == SyncTarget::Item("item-1".to_string()))
        .count();
    assert_eq!(item_records, 1);
}

#[tokio::test]
async fn test_reconnected_item_is_synced_again() {
    let engine = Engine::new();
    seed(&engine);
    engine.provider.state().item_error = Some(ProviderError::reauth_required("login expired"));
    let family = SyncTarget::Family("fam-1".to_string());
    engine
        .scheduler
        .sync_later(family.clone(), SyncWindow::default(), None)
        .await
        .unwrap();
    engine.drain().await;
    assert_eq!(
        engine.store.item("item-1").status,
        LinkedItemStatus::RequiresUpdate
    );

    {
        let mut provider = engine.provider.state();
        provider.item_error = None;
        provider.exchange_item_id = Some("ext-item-1".to_string());
    }
    let providers = Arc::new(
        ProviderRegistry::new().with_provider(Arc::new(engine.provider.clone())),
    );
    let items = LinkedItemService::new(
        Arc::new(engine.store.clone()),
        providers,
        engine.scheduler.clone(),
    );
    items
        .create_from_public_token("fam-1", "mock", "public-new", "Bank")
        .await
        .unwrap();
    engine.drain().await;

    let item = engine.store.item("item-1");
    assert_eq!(item.status, LinkedItemStatus::Good);
    assert_eq!(item.access_token, "access-public-new");
    let item_record = engine.record_for(&SyncTarget::Item("item-1".to_string()));
    assert_eq!(item_record.status, SyncStatus::Completed);
    assert_eq!(engine.store.entries().len(), 4);

    engine
        .scheduler
        .enqueue(family, SyncWindow::default(), None)
        .await
        .unwrap();
    engine.drain().await;
    let item_records = engine
        .store
        .sync_records()
        .into_iter()
        .filter(|r| r.target == SyncTarget::Item("item-1".to_string()))
        .count();
    assert_eq!(item_records, 3);
}

#[tokio::test]
async fn test_family_fan_out_continues_past_a_failed_child() {
    let engine = Engine::new();
    seed(&engine);
    engine
        .store
        .state()
        .fail_sync_records_for
        .push("manual".to_string());

    engine
        .scheduler
        .sync_later(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();
    engine.drain().await;

    let family_record = engine.record_for(&SyncTarget::Family("fam-1".to_string()));
    assert_eq!(family_record.status, SyncStatus::Completed);
    assert!(engine
        .store
        .sync_records()
        .iter()
        .all(|r| r.target != SyncTarget::Account("manual".to_string())));
    let item_record = engine.record_for(&SyncTarget::Item("item-1".to_string()));
    assert_eq!(item_record.status, SyncStatus::Completed);
    assert_eq!(engine.store.entries().len(), 4);
}
