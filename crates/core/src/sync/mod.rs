//! Sync records, their runner, scheduler and worker pool.

mod sync_handlers;
mod sync_model;
mod sync_queue;
mod sync_runner;
mod sync_scheduler;
mod sync_traits;

pub use sync_handlers::{AccountSyncHandler, FamilySyncHandler, ItemSyncHandler};
pub use sync_model::*;
pub use sync_queue::{ChannelSyncQueue, SyncQueueReceiver};
pub use sync_runner::{SyncHandlers, SyncRunner};
pub use sync_scheduler::SyncScheduler;
pub use sync_traits::{SyncHandler, SyncQueue, SyncRecordRepositoryTrait};

#[cfg(test)]
mod sync_handlers_tests;
#[cfg(test)]
mod sync_scheduler_tests;
