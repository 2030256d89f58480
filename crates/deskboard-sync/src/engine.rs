//! Wiring: one engine per board.

use std::sync::Arc;
use tokio::sync::broadcast;

use deskboard_domain::BucketFilter;
use deskboard_remote::BoardSource;

use crate::events::SyncEvent;
use crate::guards::SyncGuards;
use crate::mutation::BoardMutator;
use crate::poller::Poller;
use crate::state::{shared, BoardState, SharedState};

/// Shared state, guards, poller, and mutation layer over one remote
/// board. Views subscribe to the event stream and read/patch through
/// the same state, which is what keeps them agreeing between polls.
pub struct SyncEngine {
    pub state: SharedState,
    pub guards: Arc<SyncGuards>,
    pub poller: Arc<Poller>,
    pub mutator: BoardMutator,
    events: broadcast::Sender<SyncEvent>,
}

impl SyncEngine {
    pub fn new(source: Arc<dyn BoardSource>, filter: BucketFilter) -> Self {
        let (events, _) = broadcast::channel(64);
        let state = shared(BoardState::new(filter));
        let guards = Arc::new(SyncGuards::new());

        let poller = Arc::new(Poller::new(
            Arc::clone(&source),
            Arc::clone(&state),
            Arc::clone(&guards),
            events.clone(),
        ));
        let mutator = BoardMutator::new(source, Arc::clone(&state), Arc::clone(&guards), events.clone());

        Self {
            state,
            guards,
            poller,
            mutator,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn start(&self) {
        self.poller.start();
    }

    pub fn stop(&self) {
        self.poller.stop();
    }
}
