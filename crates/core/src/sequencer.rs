use crate::{Card, DeckLayout, RngState, MEMORIZED_ORDER};
use serde::{Deserialize, Serialize};

/// One run's display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sequence {
    cards: Vec<Card>,
    force: Card,
    force_index: usize,
}

impl Sequence {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn force(&self) -> Card {
        self.force
    }

    pub fn force_index(&self) -> usize {
        self.force_index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }
}

/// Slot the forced card occupies in a sequence of `total` cards, counted back
/// from the end and clamped so it is never the first or last slot.
///
/// `total` must be at least 3.
pub fn force_index(total: usize, offset_from_end: usize) -> usize {
    let offset = offset_from_end.clamp(1, total - 2);
    total - 1 - offset
}

/// Shuffle the deck without `force`, take `cards_to_show - 1` cards and put
/// `force` back at its fixed distance from the end.
///
/// `layout` is expected to have passed `TrickConfig::validate`.
pub fn prepare_deck(force: Card, layout: &DeckLayout, rng: &mut RngState) -> Sequence {
    let mut pool: Vec<Card> = MEMORIZED_ORDER
        .iter()
        .copied()
        .filter(|card| *card != force)
        .collect();
    rng.shuffle(&mut pool);

    let total = layout.cards_to_show;
    let slot = force_index(total, layout.force_offset_from_end);
    pool.truncate(total - 1);
    pool.insert(slot, force);

    Sequence {
        cards: pool,
        force,
        force_index: slot,
    }
}

pub fn random_card(rng: &mut RngState) -> Card {
    rng.choose(&MEMORIZED_ORDER)
        .copied()
        .unwrap_or(MEMORIZED_ORDER[0])
}
