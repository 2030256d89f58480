pub mod badge;
pub mod bucket;
pub mod card;
pub mod drag;
pub mod fields;
pub mod merge;
pub mod order;
pub mod pending;
pub mod position;
pub mod snapshot;
pub mod timer;

pub use badge::{derive_badges, Badge, BadgeKind, BadgePlacement};
pub use bucket::{find_card, find_card_mut, locate_card, Bucket, BucketId};
pub use card::{Card, CardId};
pub use drag::{DragCommit, DragEngine, DragItem, DragState};
pub use fields::FieldName;
pub use merge::{merge_buckets, MergeOutcome};
pub use order::{BucketFilter, BucketOrder};
pub use pending::{CardField, PendingLocks, SIMPLE_LOCK_TTL_MS, TIMER_LOCK_TTL_MS};
pub use position::{position_for_slot, CardPosition};
pub use snapshot::BoardSnapshot;
pub use timer::TimerKind;
