//! Background board polling.
//!
//! One immediate fetch on start, then a fixed cadence. Every cycle runs
//! the guard gauntlet first; a skipped or failed cycle just waits for
//! the next tick. No retry storm, no backoff.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use deskboard_domain::MergeOutcome;
use deskboard_remote::BoardSource;

use crate::events::SyncEvent;
use crate::guards::{SyncGuards, POLL_INTERVAL};
use crate::state::SharedState;

pub struct Poller {
    source: Arc<dyn BoardSource>,
    state: SharedState,
    guards: Arc<SyncGuards>,
    events: broadcast::Sender<SyncEvent>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn BoardSource>,
        state: SharedState,
        guards: Arc<SyncGuards>,
        events: broadcast::Sender<SyncEvent>,
    ) -> Self {
        Self {
            source,
            state,
            guards,
            events,
            task: Mutex::new(None),
        }
    }

    /// Run one poll cycle. `forced` bypasses spacing/visibility/quiet
    /// checks but still refuses to fetch mid-drag.
    pub async fn tick(&self, forced: bool) {
        let now = Instant::now();
        if let Some(reason) = self.guards.should_skip(now, forced) {
            tracing::debug!(?reason, "skipping poll cycle");
            return;
        }
        self.guards.note_fetch(now);

        match self.source.fetch_snapshot().await {
            Ok(snapshot) => {
                let outcome = self.state.lock().apply_snapshot(snapshot, Utc::now());
                if outcome == MergeOutcome::Updated {
                    let _ = self.events.send(SyncEvent::BoardRefreshed);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "board fetch failed; next cycle will retry");
            }
        }
    }

    pub async fn force_refresh(&self) {
        self.tick(true).await;
    }

    /// Spawn the polling loop. The interval's first tick fires
    /// immediately, giving the fetch-on-mount behavior.
    pub fn start(self: &Arc<Self>) {
        let poller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                poller.tick(false).await;
            }
        });

        let mut guard = self.task.lock();
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            tracing::debug!("stopped board polling");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
