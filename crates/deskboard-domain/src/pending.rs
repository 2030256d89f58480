//! Time-bounded field locks protecting optimistic edits.
//!
//! A lock means "a local edit to this field is in flight; the next polls
//! must not overwrite it". Locks are never swept by a timer: expiry is a
//! pure timestamp comparison at read time, and stale entries are harmless.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::card::CardId;
use crate::fields::FieldName;

/// Plain field and description writes confirm within one poll.
pub const SIMPLE_LOCK_TTL_MS: i64 = 2_000;
/// Timer start/stop issues multiple writes and confirms slower.
pub const TIMER_LOCK_TTL_MS: i64 = 10_000;

/// The lockable parts of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardField {
    Custom(FieldName),
    Description,
    Labels,
}

#[derive(Debug, Clone, Default)]
pub struct PendingLocks {
    locks: HashMap<CardId, HashMap<CardField, DateTime<Utc>>>,
}

impl PendingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&mut self, card_id: &str, field: CardField, now: DateTime<Utc>, ttl_ms: i64) {
        let expires_at = now + Duration::milliseconds(ttl_ms);
        self.locks
            .entry(card_id.to_string())
            .or_default()
            .insert(field, expires_at);
    }

    /// A lock holds until strictly after its expiry timestamp.
    pub fn is_locked(&self, card_id: &str, field: &CardField, now: DateTime<Utc>) -> bool {
        self.locks
            .get(card_id)
            .and_then(|fields| fields.get(field))
            .is_some_and(|expires_at| now <= *expires_at)
    }

    /// Drop a lock early (rollback path).
    pub fn release(&mut self, card_id: &str, field: &CardField) {
        if let Some(fields) = self.locks.get_mut(card_id) {
            fields.remove(field);
        }
    }

    /// All unexpired locks for a card.
    pub fn locked_fields(&self, card_id: &str, now: DateTime<Utc>) -> Vec<CardField> {
        self.locks
            .get(card_id)
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(_, expires_at)| now <= **expires_at)
                    .map(|(field, _)| *field)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.locks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_holds_until_expiry() {
        let mut locks = PendingLocks::new();
        let now = Utc::now();
        let field = CardField::Custom(FieldName::Status);

        locks.lock("c1", field, now, SIMPLE_LOCK_TTL_MS);

        assert!(locks.is_locked("c1", &field, now));
        assert!(locks.is_locked("c1", &field, now + Duration::milliseconds(2_000)));
        assert!(!locks.is_locked("c1", &field, now + Duration::milliseconds(2_001)));
    }

    #[test]
    fn test_locks_are_per_card_and_field() {
        let mut locks = PendingLocks::new();
        let now = Utc::now();

        locks.lock("c1", CardField::Description, now, SIMPLE_LOCK_TTL_MS);

        assert!(!locks.is_locked("c2", &CardField::Description, now));
        assert!(!locks.is_locked("c1", &CardField::Labels, now));
    }

    #[test]
    fn test_release() {
        let mut locks = PendingLocks::new();
        let now = Utc::now();
        let field = CardField::Custom(FieldName::Priority);

        locks.lock("c1", field, now, TIMER_LOCK_TTL_MS);
        locks.release("c1", &field);

        assert!(!locks.is_locked("c1", &field, now));
    }

    #[test]
    fn test_locked_fields_filters_expired() {
        let mut locks = PendingLocks::new();
        let now = Utc::now();

        locks.lock("c1", CardField::Custom(FieldName::Status), now, SIMPLE_LOCK_TTL_MS);
        locks.lock("c1", CardField::Labels, now, TIMER_LOCK_TTL_MS);

        let later = now + Duration::milliseconds(5_000);
        let fields = locks.locked_fields("c1", later);
        assert_eq!(fields, vec![CardField::Labels]);
    }

    #[test]
    fn test_relock_extends() {
        let mut locks = PendingLocks::new();
        let now = Utc::now();
        let field = CardField::Custom(FieldName::Status);

        locks.lock("c1", field, now, SIMPLE_LOCK_TTL_MS);
        let later = now + Duration::milliseconds(1_500);
        locks.lock("c1", field, later, SIMPLE_LOCK_TTL_MS);

        assert!(locks.is_locked("c1", &field, now + Duration::milliseconds(3_000)));
    }
}
