//! Periodic retention cleanup.
//!
//! The adapter removes old rows in bounded batches, so one `cleanup` call
//! is not guaranteed to drain everything past the cutoff; [`run_cleanup`]
//! loops until a call removes nothing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use tally_core::{LogStorage, StorageError};

/// Invoke `cleanup` until it returns 0, returning the total removed.
pub async fn run_cleanup(
    store: &dyn LogStorage,
    retention_days: u32,
) -> Result<u64, StorageError> {
    let mut total = 0;
    loop {
        let removed = store.cleanup(retention_days).await?;
        total += removed;
        if removed == 0 {
            break;
        }
    }
    Ok(total)
}

/// Spawn a task that drains expired entries at the given interval.
///
/// Returns a [`tokio::task::JoinHandle`] — abort it on shutdown.
pub fn spawn_cleanup_task(
    store: Arc<dyn LogStorage>,
    retention_days: u32,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            let _ = ticker.tick().await;
            match run_cleanup(&*store, retention_days).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, retention_days, "expired log entries removed"),
                Err(e) => warn!(error = %e, "retention cleanup failed"),
            }
        }
    })
}
