use std::sync::Arc;

use crate::accounts::Account;
use crate::items::{LinkedItemService, LinkedItemStatus};
use crate::providers::ProviderRegistry;
use crate::sync::{SyncConfig, SyncScheduler, SyncStatus, SyncTarget};
use crate::test_support::{InMemoryStore, MockProviderClient, RecordingQueue};
use crate::Error;

fn service(store: &InMemoryStore, provider: &MockProviderClient) -> LinkedItemService {
    let providers = Arc::new(ProviderRegistry::new().with_provider(Arc::new(provider.clone())));
    let scheduler = Arc::new(SyncScheduler::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(RecordingQueue::default()),
        SyncConfig::default(),
    ));
    LinkedItemService::new(Arc::new(store.clone()), providers, scheduler)
}

#[tokio::test]
async fn test_create_from_public_token_stores_item_and_queues_sync() {
    let store = InMemoryStore::new();
    let provider = MockProviderClient::new("mock");
    store.add_family("fam-1");
    let service = service(&store, &provider);

    let item = service
        .create_from_public_token("fam-1", "mock", "public-abc", "Checking at Platypus")
        .await
        .unwrap();

    assert_eq!(item.external_id, "item-for-public-abc");
    assert_eq!(item.access_token, "access-public-abc");
    assert_eq!(item.status, LinkedItemStatus::Good);
    assert_eq!(item.provider, "mock");

    let records = store.sync_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, SyncTarget::Item(item.id.clone()));
    assert_eq!(records[0].status, SyncStatus::Pending);
}

#[tokio::test]
async fn test_create_with_unknown_provider_fails() {
    let store = InMemoryStore::new();
    let provider = MockProviderClient::new("mock");
    let service = service(&store, &provider);

    let result = service
        .create_from_public_token("fam-1", "elsewhere", "public-abc", "Bank")
        .await;

    assert!(matches!(result, Err(Error::Config(_))));
    assert!(store.state().items.is_empty());
}

#[tokio::test]
async fn test_disconnect_revokes_and_cascades() {
    let store = InMemoryStore::new();
    let provider = MockProviderClient::new("mock");
    store.add_family("fam-1");
    let service = service(&store, &provider);
    let item = service
        .create_from_public_token("fam-1", "mock", "public-abc", "Bank")
        .await
        .unwrap();
    store.add_account(Account {
        id: "acc-1".to_string(),
        family_id: "fam-1".to_string(),
        linked_item_id: Some(item.id.clone()),
        external_id: Some("ext-1".to_string()),
        ..Default::default()
    });
    store.add_account(Account {
        id: "manual".to_string(),
        family_id: "fam-1".to_string(),
        ..Default::default()
    });

    service.disconnect(&item.id).await.unwrap();

    assert!(store.state().items.is_empty());
    let remaining: Vec<String> = store.state().accounts.iter().map(|a| a.id.clone()).collect();
    assert_eq!(remaining, vec!["manual".to_string()]);
    assert_eq!(
        provider.state().removed_tokens,
        vec!["access-public-abc".to_string()]
    );
}

#[tokio::test]
async fn test_relinking_an_item_that_requires_update_reconnects_it() {
    let store = InMemoryStore::new();
    let provider = MockProviderClient::new("mock");
    store.add_family("fam-1");
    let service = service(&store, &provider);
    provider.state().exchange_item_id = Some("upstream-1".to_string());
    let first = service
        .create_from_public_token("fam-1", "mock", "public-abc", "Bank")
        .await
        .unwrap();
    store
        .with_item(&first.id, |item| {
            item.status = LinkedItemStatus::RequiresUpdate;
            item.cursor = Some("c9".to_string());
        })
        .unwrap();

    let reconnected = service
        .create_from_public_token("fam-1", "mock", "public-def", "Bank")
        .await
        .unwrap();

    assert_eq!(reconnected.id, first.id);
    assert_eq!(reconnected.status, LinkedItemStatus::Good);
    assert_eq!(reconnected.access_token, "access-public-def");
    assert_eq!(reconnected.cursor.as_deref(), Some("c9"));
    assert_eq!(store.state().items.len(), 1);
    let item_syncs = store
        .sync_records()
        .into_iter()
        .filter(|r| r.target == SyncTarget::Item(first.id.clone()))
        .count();
    assert_eq!(item_syncs, 2);
}

#[tokio::test]
async fn test_relinking_into_another_family_is_rejected() {
    let store = InMemoryStore::new();
    let provider = MockProviderClient::new("mock");
    store.add_family("fam-1");
    store.add_family("fam-2");
    let service = service(&store, &provider);
    provider.state().exchange_item_id = Some("upstream-1".to_string());
    let first = service
        .create_from_public_token("fam-1", "mock", "public-abc", "Bank")
        .await
        .unwrap();

    let result = service
        .create_from_public_token("fam-2", "mock", "public-def", "Bank")
        .await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(store.item(&first.id).access_token, "access-public-abc");
}
