//! The single in-memory board state.
//!
//! Mutated only by the merge path (poll) or the mutation layer (user
//! action); the detail view reads the same structure by card id, so the
//! board and detail can never disagree.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use deskboard_domain::{
    find_card, merge_buckets, BoardSnapshot, Bucket, BucketFilter, BucketOrder, Card,
    MergeOutcome, PendingLocks,
};

#[derive(Debug, Default)]
pub struct BoardState {
    pub buckets: Vec<Bucket>,
    pub locks: PendingLocks,
    pub order: BucketOrder,
    pub filter: BucketFilter,
}

impl BoardState {
    pub fn new(filter: BucketFilter) -> Self {
        Self {
            buckets: Vec::new(),
            locks: PendingLocks::new(),
            order: BucketOrder::server_order(),
            filter,
        }
    }

    /// Reconcile one polled snapshot: persona filter, order authority,
    /// then the pending-lock merge.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot, now: DateTime<Utc>) -> MergeOutcome {
        let visible = self.filter.retain(snapshot.buckets);
        let ordered = self.order.apply(visible);
        merge_buckets(&mut self.buckets, ordered, &self.locks, now)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        find_card(&self.buckets, id)
    }

    /// Discard everything mirrored from the remote board (logout or
    /// board switch). The persona filter survives; order does not.
    pub fn reset(&mut self) {
        self.buckets.clear();
        self.locks.clear();
        self.order.reset();
    }
}

pub type SharedState = Arc<Mutex<BoardState>>;

pub fn shared(state: BoardState) -> SharedState {
    Arc::new(Mutex::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(titles: &[(&str, &str)]) -> BoardSnapshot {
        BoardSnapshot::from_buckets(
            titles
                .iter()
                .map(|(id, title)| Bucket::new(*id, *title))
                .collect(),
        )
    }

    #[test]
    fn test_apply_snapshot_filters_and_orders() {
        let mut state = BoardState::new(BucketFilter::from_titles(&["Today", "This Week"]));
        state
            .order
            .set(vec!["l2".to_string(), "l1".to_string()]);

        let outcome = state.apply_snapshot(
            snapshot(&[("l1", "Today"), ("l2", "This Week"), ("l3", "Backlog")]),
            Utc::now(),
        );

        assert_eq!(outcome, MergeOutcome::Updated);
        let titles: Vec<&str> = state.buckets.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["This Week", "Today"]);
    }

    #[test]
    fn test_repeat_snapshot_unchanged() {
        let mut state = BoardState::new(BucketFilter::all());
        state.apply_snapshot(snapshot(&[("l1", "Today")]), Utc::now());

        let outcome = state.apply_snapshot(snapshot(&[("l1", "Today")]), Utc::now());
        assert_eq!(outcome, MergeOutcome::Unchanged);
    }

    #[test]
    fn test_reset() {
        let mut state = BoardState::new(BucketFilter::all());
        state.apply_snapshot(snapshot(&[("l1", "Today")]), Utc::now());
        state.order.set(vec!["l1".to_string()]);

        state.reset();
        assert!(state.buckets.is_empty());
        assert!(!state.order.is_user_defined());
    }
}
