//! Fractional insertion positions.
//!
//! The remote board orders cards by a numeric `pos`. Dropping a card
//! between two siblings commits the midpoint of their positions; the two
//! ends use the service's symbolic top/bottom markers.

use serde::{Deserialize, Serialize};

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CardPosition {
    Top,
    Bottom,
    At(f64),
}

impl CardPosition {
    /// Wire form understood by the remote service.
    pub fn to_param(self) -> String {
        match self {
            CardPosition::Top => "top".to_string(),
            CardPosition::Bottom => "bottom".to_string(),
            CardPosition::At(pos) => format!("{}", pos),
        }
    }
}

/// Position for the card sitting at `index` of `cards` (the card itself
/// included, i.e. the list as it reads after the drop).
pub fn position_for_slot(cards: &[Card], index: usize) -> CardPosition {
    if index == 0 {
        CardPosition::Top
    } else if index + 1 >= cards.len() {
        CardPosition::Bottom
    } else {
        CardPosition::At((cards[index - 1].pos + cards[index + 1].pos) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_at(id: &str, pos: f64) -> Card {
        let mut card = Card::new(id, "b1", id);
        card.pos = pos;
        card
    }

    #[test]
    fn test_midpoint_between_siblings() {
        let cards = vec![card_at("a", 10.0), card_at("x", 0.0), card_at("b", 20.0)];
        assert_eq!(position_for_slot(&cards, 1), CardPosition::At(15.0));
    }

    #[test]
    fn test_head_is_top() {
        let cards = vec![card_at("x", 0.0), card_at("a", 10.0)];
        assert_eq!(position_for_slot(&cards, 0), CardPosition::Top);
    }

    #[test]
    fn test_tail_is_bottom() {
        let cards = vec![card_at("a", 10.0), card_at("x", 0.0)];
        assert_eq!(position_for_slot(&cards, 1), CardPosition::Bottom);
    }

    #[test]
    fn test_only_card_is_top() {
        let cards = vec![card_at("x", 0.0)];
        assert_eq!(position_for_slot(&cards, 0), CardPosition::Top);
    }

    #[test]
    fn test_to_param() {
        assert_eq!(CardPosition::Top.to_param(), "top");
        assert_eq!(CardPosition::Bottom.to_param(), "bottom");
        assert_eq!(CardPosition::At(15.0).to_param(), "15");
        assert_eq!(CardPosition::At(12.5).to_param(), "12.5");
    }
}
