//! Background scheduler for periodic family sync.

use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Initial delay before first sync (60 seconds to let server fully start)
const INITIAL_DELAY_SECS: u64 = 60;

/// Starts the background scheduler that enqueues a sync for every family.
pub fn start_family_sync_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Family sync scheduler started ({}s interval)", every.as_secs());

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // First tick is immediate, subsequent ticks are `every` apart
        let mut sync_interval = interval(every);
        sync_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            sync_interval.tick().await;
            run_scheduled_sync(&state).await;
        }
    });
}

/// Runs a single scheduled pass. Families that are already syncing keep
/// their active record instead of getting a second one.
pub async fn run_scheduled_sync(state: &AppState) {
    info!("Running scheduled family sync...");
    match state.scheduler.sync_all_families().await {
        Ok(records) => info!("Scheduled family sync queued {} records", records.len()),
        Err(e) => warn!("Scheduled family sync failed: {}", e),
    }
}
