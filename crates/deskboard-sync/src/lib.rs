pub mod engine;
pub mod events;
pub mod guards;
pub mod mutation;
pub mod poller;
pub mod state;

pub use engine::SyncEngine;
pub use events::SyncEvent;
pub use guards::{SkipReason, SyncGuards, MIN_FETCH_SPACING, POLL_INTERVAL, POST_MOVE_QUIET};
pub use mutation::BoardMutator;
pub use poller::Poller;
pub use state::{shared, BoardState, SharedState};
