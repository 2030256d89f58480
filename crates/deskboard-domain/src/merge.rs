//! Snapshot reconciliation.
//!
//! Combines a freshly polled snapshot with current local state without
//! discarding in-flight optimistic edits: any field under an unexpired
//! pending lock keeps its local value, everything else adopts server
//! truth. An incoming state that reconciles to exactly the current state
//! is reported as `Unchanged` so callers skip the re-render.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::bucket::Bucket;
use crate::card::Card;
use crate::pending::{CardField, PendingLocks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Unchanged,
    Updated,
}

pub fn merge_buckets(
    current: &mut Vec<Bucket>,
    mut incoming: Vec<Bucket>,
    locks: &PendingLocks,
    now: DateTime<Utc>,
) -> MergeOutcome {
    {
        let existing: HashMap<&str, &Card> = current
            .iter()
            .flat_map(|bucket| bucket.cards.iter())
            .map(|card| (card.id.as_str(), card))
            .collect();

        for bucket in &mut incoming {
            for card in &mut bucket.cards {
                if let Some(local) = existing.get(card.id.as_str()) {
                    for field in locks.locked_fields(&card.id, now) {
                        match field {
                            CardField::Custom(name) => {
                                card.set_field(name, local.field(name).to_string());
                            }
                            CardField::Description => {
                                card.description = local.description.clone();
                            }
                            CardField::Labels => {
                                card.labels = local.labels.clone();
                            }
                        }
                    }
                }
                card.refresh_badges();
            }
        }
    }

    if incoming == *current {
        MergeOutcome::Unchanged
    } else {
        *current = incoming;
        MergeOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldName;
    use crate::pending::SIMPLE_LOCK_TTL_MS;
    use chrono::Duration;

    fn board_with_status(status: &str) -> Vec<Bucket> {
        let mut bucket = Bucket::new("b1", "Today");
        let mut card = Card::new("c1", "b1", "Review reserves");
        card.set_field(FieldName::Status, status.to_string());
        card.refresh_badges();
        bucket.cards.push(card);
        vec![bucket]
    }

    #[test]
    fn test_identical_snapshot_is_unchanged() {
        let mut current = board_with_status("Doing");
        let incoming = current.clone();
        let locks = PendingLocks::new();

        let outcome = merge_buckets(&mut current, incoming, &locks, Utc::now());
        assert_eq!(outcome, MergeOutcome::Unchanged);

        // And again: merging twice produces no further change
        let incoming = current.clone();
        let outcome = merge_buckets(&mut current, incoming, &locks, Utc::now());
        assert_eq!(outcome, MergeOutcome::Unchanged);
    }

    #[test]
    fn test_server_truth_adopted_without_locks() {
        let mut current = board_with_status("Doing");
        let incoming = board_with_status("Done");
        let locks = PendingLocks::new();

        let outcome = merge_buckets(&mut current, incoming, &locks, Utc::now());
        assert_eq!(outcome, MergeOutcome::Updated);
        assert_eq!(current[0].cards[0].field(FieldName::Status), "Done");
    }

    #[test]
    fn test_locked_field_keeps_local_value() {
        let now = Utc::now();
        let mut current = board_with_status("Doing");
        let incoming = board_with_status("Done");

        let mut locks = PendingLocks::new();
        locks.lock(
            "c1",
            CardField::Custom(FieldName::Status),
            now,
            SIMPLE_LOCK_TTL_MS,
        );

        let outcome = merge_buckets(&mut current, incoming, &locks, now);
        // The poll carried nothing else, so the reconciled state is unchanged
        assert_eq!(outcome, MergeOutcome::Unchanged);
        assert_eq!(current[0].cards[0].field(FieldName::Status), "Doing");
    }

    #[test]
    fn test_expired_lock_lets_server_win() {
        let now = Utc::now();
        let mut current = board_with_status("Doing");
        let incoming = board_with_status("Done");

        let mut locks = PendingLocks::new();
        locks.lock(
            "c1",
            CardField::Custom(FieldName::Status),
            now,
            SIMPLE_LOCK_TTL_MS,
        );

        let after_expiry = now + Duration::milliseconds(3_000);
        let outcome = merge_buckets(&mut current, incoming, &locks, after_expiry);
        assert_eq!(outcome, MergeOutcome::Updated);
        assert_eq!(current[0].cards[0].field(FieldName::Status), "Done");
    }

    #[test]
    fn test_priority_pending_scenario() {
        // User sets Priority to URGENT on a card the server still has unset
        let now = Utc::now();
        let mut current = board_with_status("Doing");
        current[0].cards[0].set_field(FieldName::Priority, "URGENT");
        current[0].cards[0].refresh_badges();

        let mut locks = PendingLocks::new();
        locks.lock(
            "c1",
            CardField::Custom(FieldName::Priority),
            now,
            SIMPLE_LOCK_TTL_MS,
        );

        // Poll lands 500ms later, Priority still empty server-side
        let incoming = board_with_status("Doing");
        merge_buckets(
            &mut current,
            incoming,
            &locks,
            now + Duration::milliseconds(500),
        );
        assert_eq!(current[0].cards[0].field(FieldName::Priority), "URGENT");

        // Poll lands 3s later (past the 2s TTL): the empty value wins
        let incoming = board_with_status("Doing");
        merge_buckets(
            &mut current,
            incoming,
            &locks,
            now + Duration::milliseconds(3_000),
        );
        assert_eq!(current[0].cards[0].field(FieldName::Priority), "");
    }

    #[test]
    fn test_locked_description_and_labels_survive() {
        let now = Utc::now();
        let mut current = board_with_status("Doing");
        current[0].cards[0].description = "local draft".to_string();
        current[0].cards[0].labels.insert("blocked".to_string());
        current[0].cards[0].refresh_badges();

        let mut locks = PendingLocks::new();
        locks.lock("c1", CardField::Description, now, SIMPLE_LOCK_TTL_MS);
        locks.lock("c1", CardField::Labels, now, SIMPLE_LOCK_TTL_MS);

        let incoming = board_with_status("Doing");
        merge_buckets(&mut current, incoming, &locks, now);

        assert_eq!(current[0].cards[0].description, "local draft");
        assert!(current[0].cards[0].has_label("blocked"));
    }

    #[test]
    fn test_card_gone_from_server_is_dropped() {
        let mut current = board_with_status("Doing");
        let incoming = vec![Bucket::new("b1", "Today")];
        let locks = PendingLocks::new();

        let outcome = merge_buckets(&mut current, incoming, &locks, Utc::now());
        assert_eq!(outcome, MergeOutcome::Updated);
        assert!(current[0].cards.is_empty());
    }

    #[test]
    fn test_badges_recomputed_on_merge() {
        let mut current = board_with_status("Doing");
        let mut incoming = board_with_status("Doing");
        incoming[0].cards[0].set_field(FieldName::Priority, "HIGH");
        incoming[0].cards[0].badges.clear(); // wire layer never sets badges

        merge_buckets(&mut current, incoming, &locks_none(), Utc::now());
        assert!(current[0].cards[0]
            .badges
            .iter()
            .any(|b| b.text == "HIGH"));
    }

    fn locks_none() -> PendingLocks {
        PendingLocks::new()
    }
}
