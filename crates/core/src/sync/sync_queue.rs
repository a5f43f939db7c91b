//! In-process worker pool for sync records.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use super::sync_runner::SyncRunner;
use super::sync_traits::SyncQueue;
use crate::errors::{Error, Result};

/// Unbounded channel feeding record ids to a dispatcher task.
#[derive(Clone)]
pub struct ChannelSyncQueue {
    sender: mpsc::UnboundedSender<String>,
}

/// Receiving half, consumed when the workers start.
pub struct SyncQueueReceiver {
    receiver: mpsc::UnboundedReceiver<String>,
}

impl ChannelSyncQueue {
    pub fn new() -> (Self, SyncQueueReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, SyncQueueReceiver { receiver })
    }
}

impl SyncQueue for ChannelSyncQueue {
    fn submit(&self, record_id: &str) -> Result<()> {
        self.sender
            .send(record_id.to_string())
            .map_err(|_| Error::Unexpected("Sync queue is closed".to_string()))
    }
}

impl SyncQueueReceiver {
    /// Spawns the dispatcher. At most `concurrency` records execute at once.
    ///
    /// The dispatcher exits once every queue handle has been dropped and the
    /// channel is drained.
    pub fn start_workers(self, runner: Arc<SyncRunner>, concurrency: usize) -> JoinHandle<()> {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut receiver = self.receiver;

        tokio::spawn(async move {
            info!("Sync worker pool started with {} workers", concurrency.max(1));
            while let Some(record_id) = receiver.recv().await {
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let runner = runner.clone();
                tokio::spawn(async move {
                    debug!("Executing sync record {}", record_id);
                    if let Err(e) = runner.execute(&record_id).await {
                        error!("Sync record {} could not be executed: {}", record_id, e);
                    }
                    drop(permit);
                });
            }
            info!("Sync worker pool stopped");
        })
    }
}
