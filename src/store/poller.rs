//! Periodic refresh driver.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::PriceDataStore;

/// Drives `refresh` on a fixed interval from a background task.
///
/// Each tick awaits the previous refresh before the next one is taken,
/// so the poller never stacks overlapping refreshes; a manual
/// pull-to-refresh may still overlap a tick, which is safe because every
/// facet write is a full-value replace.
///
/// `stop` aborts the task. A tick in flight is dropped at its next await
/// point, so a cancelled tick's pending facet writes never apply. The
/// poller also aborts on drop.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn start(store: Arc<PriceDataStore>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick resolves immediately and the caller has
            // already bootstrapped, so consume it before the loop.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                debug!("poll tick");
                store.refresh().await;
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
