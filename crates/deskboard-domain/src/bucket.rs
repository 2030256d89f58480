use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};

/// Opaque id assigned by the remote board.
pub type BucketId = String;

/// One column of the board: an ordered run of cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Bucket {
    pub fn new(id: impl Into<BucketId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn card_index(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }
}

/// Locate a card anywhere in a bucket list.
pub fn find_card<'a>(buckets: &'a [Bucket], id: &str) -> Option<&'a Card> {
    buckets.iter().find_map(|bucket| bucket.card(id))
}

pub fn find_card_mut<'a>(buckets: &'a mut [Bucket], id: &str) -> Option<&'a mut Card> {
    buckets
        .iter_mut()
        .find_map(|bucket| bucket.cards.iter_mut().find(|card| card.id == id))
}

/// (bucket index, card index) of a card, if present.
pub fn locate_card(buckets: &[Bucket], id: &CardId) -> Option<(usize, usize)> {
    buckets.iter().enumerate().find_map(|(bucket_idx, bucket)| {
        bucket.card_index(id).map(|card_idx| (bucket_idx, card_idx))
    })
}
