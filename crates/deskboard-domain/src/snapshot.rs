//! One full read of board state from the remote service.
//!
//! Snapshots are produced by the remote layer's normalization step, so
//! downstream code (merge, UI) never sees missing fields. All fields use
//! `#[serde(default)]` to tolerate partial payloads.

use serde::{Deserialize, Serialize};

use crate::bucket::Bucket;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

impl BoardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_buckets(buckets: Vec<Bucket>) -> Self {
        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.cards.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = BoardSnapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.card_count(), 0);
    }

    #[test]
    fn test_partial_deserialization() {
        // Missing fields default (forward compatibility with the wire layer)
        let snapshot: BoardSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.buckets.is_empty());

        let snapshot: BoardSnapshot =
            serde_json::from_str(r#"{"buckets": [{"id": "b1", "title": "Today"}]}"#).unwrap();
        assert_eq!(snapshot.buckets.len(), 1);
        assert!(snapshot.buckets[0].cards.is_empty());
    }

    #[test]
    fn test_card_count() {
        let mut bucket = Bucket::new("b1", "Today");
        bucket.cards.push(Card::new("c1", "b1", "One"));
        bucket.cards.push(Card::new("c2", "b1", "Two"));

        let snapshot = BoardSnapshot::from_buckets(vec![bucket]);
        assert_eq!(snapshot.card_count(), 2);
    }
}
