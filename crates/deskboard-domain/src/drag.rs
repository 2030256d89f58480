//! Reorder gesture state machine.
//!
//! One gesture moves either a bucket or a card, never both. While the
//! gesture is live the item is spliced through the bucket vec so the UI
//! shows it already relocated; the commit (at most one per gesture) is
//! produced on drop. A gesture that never reaches drop must go through
//! `cancel` so polling resumes.

use crate::bucket::{Bucket, BucketId};
use crate::card::CardId;
use crate::position::{position_for_slot, CardPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItem {
    Bucket {
        origin: usize,
        current: usize,
    },
    Card {
        origin: (usize, usize),
        current: (usize, usize),
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragItem),
}

/// What a completed gesture asks the rest of the system to do.
#[derive(Debug, Clone, PartialEq)]
pub enum DragCommit {
    /// New bucket order. Local authority only: the remote service has no
    /// durable list-order field the client controls.
    BucketOrder(Vec<BucketId>),
    /// Exactly one move request for the gesture.
    CardMove {
        card_id: CardId,
        target_bucket: BucketId,
        index: usize,
        position: CardPosition,
    },
}

#[derive(Debug, Default)]
pub struct DragEngine {
    state: DragState,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Pick up a bucket. Ignored mid-gesture or out of range.
    pub fn begin_bucket(&mut self, index: usize, buckets: &[Bucket]) -> bool {
        if self.is_dragging() || index >= buckets.len() {
            return false;
        }
        self.state = DragState::Dragging(DragItem::Bucket {
            origin: index,
            current: index,
        });
        true
    }

    /// Pick up a card. Ignored mid-gesture or out of range.
    pub fn begin_card(&mut self, bucket: usize, card: usize, buckets: &[Bucket]) -> bool {
        if self.is_dragging() {
            return false;
        }
        let valid = buckets
            .get(bucket)
            .is_some_and(|b| card < b.cards.len());
        if !valid {
            return false;
        }
        self.state = DragState::Dragging(DragItem::Card {
            origin: (bucket, card),
            current: (bucket, card),
        });
        true
    }

    /// Move the dragged bucket over another slot. Card gestures ignore
    /// bucket slots entirely.
    pub fn enter_bucket_slot(&mut self, buckets: &mut Vec<Bucket>, target: usize) {
        let DragState::Dragging(DragItem::Bucket { origin, current }) = self.state else {
            return;
        };
        let target = target.min(buckets.len().saturating_sub(1));
        if target == current {
            return;
        }
        let bucket = buckets.remove(current);
        buckets.insert(target, bucket);
        self.state = DragState::Dragging(DragItem::Bucket {
            origin,
            current: target,
        });
    }

    /// Move the dragged card over a slot in some bucket. Bucket gestures
    /// ignore card slots entirely.
    pub fn enter_card_slot(
        &mut self,
        buckets: &mut [Bucket],
        target_bucket: usize,
        target_index: usize,
    ) {
        let DragState::Dragging(DragItem::Card { origin, current }) = self.state else {
            return;
        };
        if target_bucket >= buckets.len() {
            return;
        }
        if (target_bucket, target_index) == current {
            return;
        }

        let card = buckets[current.0].cards.remove(current.1);
        let slot = target_index.min(buckets[target_bucket].cards.len());
        buckets[target_bucket].cards.insert(slot, card);

        self.state = DragState::Dragging(DragItem::Card {
            origin,
            current: (target_bucket, slot),
        });
    }

    /// Finish the gesture. Returns the commit to issue, or `None` when
    /// the item landed back in its origin slot.
    pub fn drop(&mut self, buckets: &mut [Bucket]) -> Option<DragCommit> {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle => None,
            DragState::Dragging(DragItem::Bucket { origin, current }) => {
                if origin == current {
                    return None;
                }
                Some(DragCommit::BucketOrder(
                    buckets.iter().map(|bucket| bucket.id.clone()).collect(),
                ))
            }
            DragState::Dragging(DragItem::Card { origin, current }) => {
                if origin == current {
                    return None;
                }
                let (bucket_idx, card_idx) = current;
                let target_bucket = buckets[bucket_idx].id.clone();
                buckets[bucket_idx].cards[card_idx].bucket_id = target_bucket.clone();
                let position = position_for_slot(&buckets[bucket_idx].cards, card_idx);
                let card_id = buckets[bucket_idx].cards[card_idx].id.clone();
                Some(DragCommit::CardMove {
                    card_id,
                    target_bucket,
                    index: card_idx,
                    position,
                })
            }
        }
    }

    /// Abandon the gesture, splicing the item back where it started.
    pub fn cancel(&mut self, buckets: &mut Vec<Bucket>) {
        let state = std::mem::take(&mut self.state);
        match state {
            DragState::Idle => {}
            DragState::Dragging(DragItem::Bucket { origin, current }) => {
                if origin != current && current < buckets.len() {
                    let bucket = buckets.remove(current);
                    buckets.insert(origin.min(buckets.len()), bucket);
                }
            }
            DragState::Dragging(DragItem::Card { origin, current }) => {
                if origin != current {
                    let card = buckets[current.0].cards.remove(current.1);
                    let slot = origin.1.min(buckets[origin.0].cards.len());
                    buckets[origin.0].cards.insert(slot, card);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;

    fn board() -> Vec<Bucket> {
        let mut a = Bucket::new("A", "Today");
        for (id, pos) in [("a0", 10.0), ("a1", 20.0), ("a2", 30.0)] {
            let mut card = Card::new(id, "A", id);
            card.pos = pos;
            a.cards.push(card);
        }
        let mut b = Bucket::new("B", "This Week");
        for (id, pos) in [("b0", 10.0), ("b1", 20.0)] {
            let mut card = Card::new(id, "B", id);
            card.pos = pos;
            b.cards.push(card);
        }
        vec![a, b, Bucket::new("C", "Done")]
    }

    #[test]
    fn test_card_move_to_other_bucket_head() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        assert!(engine.begin_card(0, 2, &buckets));
        engine.enter_card_slot(&mut buckets, 1, 0);
        let commit = engine.drop(&mut buckets);

        // Bucket A lost the card, bucket B gained it at its head
        assert_eq!(buckets[0].cards.len(), 2);
        assert_eq!(buckets[1].cards[0].id, "a2");
        assert_eq!(buckets[1].cards[0].bucket_id, "B");

        match commit {
            Some(DragCommit::CardMove {
                card_id,
                target_bucket,
                index,
                position,
            }) => {
                assert_eq!(card_id, "a2");
                assert_eq!(target_bucket, "B");
                assert_eq!(index, 0);
                assert_eq!(position, CardPosition::Top);
            }
            other => panic!("expected CardMove, got {:?}", other),
        }
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_card_midpoint_position() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        // a0 (pos 10) dragged between a1 (20) and a2 (30)
        engine.begin_card(0, 0, &buckets);
        engine.enter_card_slot(&mut buckets, 0, 1);
        let commit = engine.drop(&mut buckets).unwrap();

        match commit {
            DragCommit::CardMove { position, .. } => {
                assert_eq!(position, CardPosition::At(25.0));
            }
            other => panic!("expected CardMove, got {:?}", other),
        }
    }

    #[test]
    fn test_same_slot_drop_is_noop() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_card(0, 1, &buckets);
        engine.enter_card_slot(&mut buckets, 1, 0);
        engine.enter_card_slot(&mut buckets, 0, 1);
        assert_eq!(engine.drop(&mut buckets), None);
        assert_eq!(buckets[0].cards[1].id, "a1");
    }

    #[test]
    fn test_bucket_reorder_commit() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_bucket(1, &buckets);
        engine.enter_bucket_slot(&mut buckets, 0);
        let commit = engine.drop(&mut buckets);

        assert_eq!(
            commit,
            Some(DragCommit::BucketOrder(vec![
                "B".to_string(),
                "A".to_string(),
                "C".to_string()
            ]))
        );
    }

    #[test]
    fn test_bucket_gesture_ignores_card_slots() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_bucket(0, &buckets);
        engine.enter_card_slot(&mut buckets, 1, 0);

        // Still a bucket drag, nothing moved
        assert_eq!(buckets[1].cards.len(), 2);
        assert!(matches!(
            engine.state(),
            DragState::Dragging(DragItem::Bucket { .. })
        ));
    }

    #[test]
    fn test_card_gesture_ignores_bucket_slots() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_card(0, 0, &buckets);
        engine.enter_bucket_slot(&mut buckets, 2);

        assert_eq!(buckets[0].id, "A");
        assert!(matches!(
            engine.state(),
            DragState::Dragging(DragItem::Card { .. })
        ));
    }

    #[test]
    fn test_cancel_restores_origin() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_card(0, 2, &buckets);
        engine.enter_card_slot(&mut buckets, 1, 0);
        engine.cancel(&mut buckets);

        assert!(!engine.is_dragging());
        assert_eq!(buckets[0].cards[2].id, "a2");
        assert_eq!(buckets[1].cards.len(), 2);
    }

    #[test]
    fn test_second_begin_ignored_mid_gesture() {
        let buckets = board();
        let mut engine = DragEngine::new();

        assert!(engine.begin_card(0, 0, &buckets));
        assert!(!engine.begin_bucket(1, &buckets));
        assert!(!engine.begin_card(1, 0, &buckets));
    }

    #[test]
    fn test_move_within_bucket_to_tail() {
        let mut buckets = board();
        let mut engine = DragEngine::new();

        engine.begin_card(0, 0, &buckets);
        engine.enter_card_slot(&mut buckets, 0, 2);
        let commit = engine.drop(&mut buckets).unwrap();

        match commit {
            DragCommit::CardMove { index, position, .. } => {
                assert_eq!(index, 2);
                assert_eq!(position, CardPosition::Bottom);
            }
            other => panic!("expected CardMove, got {:?}", other),
        }
        assert_eq!(buckets[0].cards[2].id, "a0");
    }
}
