use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use super::*;
use crate::accounts::Account;
use crate::events::NoOpDomainEventSink;
use crate::items::LinkedItem;
use crate::test_support::{InMemoryStore, RecordingQueue};

fn build_scheduler(store: &InMemoryStore, queue: Arc<dyn SyncQueue>) -> SyncScheduler {
    SyncScheduler::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        queue,
        SyncConfig::default(),
    )
}

fn aged_record(target: SyncTarget, status: SyncStatus, minutes_ago: i64) -> SyncRecord {
    let created_at = Utc::now() - Duration::minutes(minutes_ago);
    SyncRecord {
        id: format!("rec-{}-{}", target.id(), minutes_ago),
        target,
        status,
        parent_id: None,
        window: SyncWindow::default(),
        error: None,
        created_at,
        updated_at: created_at,
    }
}

fn seed_family(store: &InMemoryStore) {
    store.add_family("fam-1");
    store.add_account(Account {
        id: "acc-1".to_string(),
        family_id: "fam-1".to_string(),
        is_active: true,
        ..Default::default()
    });
    store.add_item(LinkedItem {
        id: "item-1".to_string(),
        family_id: "fam-1".to_string(),
        external_id: "ext-item-1".to_string(),
        ..Default::default()
    });
}

#[tokio::test]
async fn test_enqueue_creates_pending_record_and_submits() {
    let store = InMemoryStore::new();
    let queue = RecordingQueue::default();
    let scheduler = build_scheduler(&store, Arc::new(queue.clone()));

    let record = scheduler
        .enqueue(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(record.status, SyncStatus::Pending);
    assert_eq!(queue.submitted(), vec![record.id.clone()]);
}

#[tokio::test]
async fn test_sync_later_collapses_onto_active_record() {
    let store = InMemoryStore::new();
    let queue = RecordingQueue::default();
    let scheduler = build_scheduler(&store, Arc::new(queue.clone()));
    let target = SyncTarget::Item("item-1".to_string());

    let first = scheduler
        .sync_later(target.clone(), SyncWindow::default(), None)
        .await
        .unwrap();
    let second = scheduler
        .sync_later(target.clone(), SyncWindow::default(), None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(queue.submitted().len(), 1);
    assert_eq!(store.sync_records().len(), 1);
}

#[tokio::test]
async fn test_sync_later_ignores_stale_and_terminal_records() {
    let store = InMemoryStore::new();
    let queue = RecordingQueue::default();
    let scheduler = build_scheduler(&store, Arc::new(queue.clone()));
    let target = SyncTarget::Item("item-1".to_string());
    store.add_sync_record(aged_record(target.clone(), SyncStatus::Pending, 11));
    store.add_sync_record(aged_record(target.clone(), SyncStatus::Failed, 1));

    scheduler
        .sync_later(target, SyncWindow::default(), None)
        .await
        .unwrap();

    assert_eq!(queue.submitted().len(), 1);
    assert_eq!(store.sync_records().len(), 3);
}

#[tokio::test]
async fn test_sync_all_families_enqueues_one_per_family() {
    let store = InMemoryStore::new();
    store.add_family("fam-1");
    store.add_family("fam-2");
    let queue = RecordingQueue::default();
    let scheduler = build_scheduler(&store, Arc::new(queue.clone()));

    let records = scheduler.sync_all_families().await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(records
        .iter()
        .all(|r| matches!(r.target, SyncTarget::Family(_))));
    assert_eq!(queue.submitted().len(), 2);
}

#[test]
fn test_pending_record_eleven_minutes_old_is_not_syncing() {
    let store = InMemoryStore::new();
    seed_family(&store);
    let scheduler = build_scheduler(&store, Arc::new(RecordingQueue::default()));
    store.add_sync_record(aged_record(
        SyncTarget::Family("fam-1".to_string()),
        SyncStatus::Pending,
        11,
    ));

    assert!(!scheduler.is_family_syncing("fam-1").unwrap());
}

#[test]
fn test_pending_record_two_minutes_old_is_syncing() {
    let store = InMemoryStore::new();
    seed_family(&store);
    let scheduler = build_scheduler(&store, Arc::new(RecordingQueue::default()));
    store.add_sync_record(aged_record(
        SyncTarget::Family("fam-1".to_string()),
        SyncStatus::Pending,
        2,
    ));

    assert!(scheduler.is_family_syncing("fam-1").unwrap());
}

#[test]
fn test_child_records_count_toward_family_syncing() {
    let store = InMemoryStore::new();
    seed_family(&store);
    let scheduler = build_scheduler(&store, Arc::new(RecordingQueue::default()));

    store.add_sync_record(aged_record(
        SyncTarget::Item("item-1".to_string()),
        SyncStatus::Syncing,
        3,
    ));
    assert!(scheduler.is_family_syncing("fam-1").unwrap());

    let other = InMemoryStore::new();
    seed_family(&other);
    other.add_sync_record(aged_record(
        SyncTarget::Account("acc-1".to_string()),
        SyncStatus::Completed,
        1,
    ));
    let other_scheduler = build_scheduler(&other, Arc::new(RecordingQueue::default()));
    assert!(!other_scheduler.is_family_syncing("fam-1").unwrap());
}

/// Family handler that does nothing, so the pool test only exercises the queue.
struct IdleHandler;

#[async_trait::async_trait]
impl SyncHandler for IdleHandler {
    async fn sync_data(&self, _record: &SyncRecord) -> crate::Result<()> {
        Ok(())
    }

    async fn post_sync(&self, _record: &SyncRecord) -> crate::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_worker_pool_executes_submitted_records() {
    let store = InMemoryStore::new();
    let (queue, receiver) = ChannelSyncQueue::new();
    let scheduler = build_scheduler(&store, Arc::new(queue));
    let handler: Arc<dyn SyncHandler> = Arc::new(IdleHandler);
    let runner = Arc::new(SyncRunner::new(
        Arc::new(store.clone()),
        SyncHandlers {
            family: handler.clone(),
            item: handler.clone(),
            account: handler,
        },
        Arc::new(NoOpDomainEventSink),
    ));
    let _workers = receiver.start_workers(runner, 2);

    let record = scheduler
        .enqueue(
            SyncTarget::Family("fam-1".to_string()),
            SyncWindow::default(),
            None,
        )
        .await
        .unwrap();

    let mut status = SyncStatus::Pending;
    for _ in 0..100 {
        status = SyncRecordRepositoryTrait::get_by_id(&store, &record.id)
            .unwrap()
            .status;
        if status.is_terminal() {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert_eq!(status, SyncStatus::Completed);
}
