use crate::{Card, Rank, Suit};

pub const DECK_SIZE: usize = 52;

/// Image shown while no card is face up. The ace of spades art doubles as the
/// face-down placeholder.
pub const BACK_ASSET: &str = "cards/as.png";

const STACK_CODES: [&str; DECK_SIZE] = [
    "as", "5h", "9s", "2s", "qh", "3d", "qc", "8h", "6s", "5s", "9h", "kc", //
    "2d", "jh", "3s", "8s", "6h", "xc", "5d", "kd", "2c", "3h", "8d", "5c", //
    "ks", "jd", "8c", "xs", "kh", "jc", "7s", "xh", "ad", "4s", "7h", "4d", //
    "ac", "9c", "js", "qd", "7d", "qs", "xd", "6c", "ah", "9d", "4c", "2h", //
    "7c", "3c", "4h", "6d",
];

/// The memorized (rotated Mnemonica) order. Never re-derived at runtime.
pub const MEMORIZED_ORDER: [Card; DECK_SIZE] = parse_stack(STACK_CODES);

const fn parse_stack(codes: [&str; DECK_SIZE]) -> [Card; DECK_SIZE] {
    let mut out = [Card::new(Rank::Ace, Suit::Spades); DECK_SIZE];
    let mut idx = 0;
    while idx < DECK_SIZE {
        let bytes = codes[idx].as_bytes();
        assert!(bytes.len() == 2, "stack codes are two characters");
        out[idx] = Card::new(const_rank(bytes[0]), const_suit(bytes[1]));
        idx += 1;
    }
    out
}

const fn const_rank(byte: u8) -> Rank {
    match byte {
        b'a' => Rank::Ace,
        b'2' => Rank::Two,
        b'3' => Rank::Three,
        b'4' => Rank::Four,
        b'5' => Rank::Five,
        b'6' => Rank::Six,
        b'7' => Rank::Seven,
        b'8' => Rank::Eight,
        b'9' => Rank::Nine,
        b'x' => Rank::Ten,
        b'j' => Rank::Jack,
        b'q' => Rank::Queen,
        b'k' => Rank::King,
        _ => panic!("bad rank in stack"),
    }
}

const fn const_suit(byte: u8) -> Suit {
    match byte {
        b's' => Suit::Spades,
        b'h' => Suit::Hearts,
        b'c' => Suit::Clubs,
        b'd' => Suit::Diamonds,
        _ => panic!("bad suit in stack"),
    }
}

pub fn memorized_deck() -> &'static [Card; DECK_SIZE] {
    &MEMORIZED_ORDER
}

/// 1-based stack number of `card` in the memorized order.
pub fn stack_position(card: Card) -> usize {
    MEMORIZED_ORDER
        .iter()
        .position(|entry| *entry == card)
        .map(|idx| idx + 1)
        .unwrap_or_default()
}

pub fn card_at_position(position: usize) -> Option<Card> {
    position
        .checked_sub(1)
        .and_then(|idx| MEMORIZED_ORDER.get(idx).copied())
}

pub fn asset_path(card: Card) -> String {
    format!("cards/{}.png", card.code())
}

/// Every deck image, in stack order, for eager preloading.
pub fn preload_assets() -> Vec<String> {
    MEMORIZED_ORDER.iter().copied().map(asset_path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stack_holds_every_card_once() {
        let unique: HashSet<Card> = MEMORIZED_ORDER.iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                assert!(unique.contains(&Card::new(rank, suit)));
            }
        }
    }

    #[test]
    fn stack_matches_codes() {
        for (card, code) in MEMORIZED_ORDER.iter().zip(STACK_CODES) {
            assert_eq!(card.code(), code);
        }
        assert_eq!(MEMORIZED_ORDER[0].code(), "as");
        assert_eq!(MEMORIZED_ORDER[DECK_SIZE - 1].code(), "6d");
    }

    #[test]
    fn positions_are_one_based() {
        let queen = Card::new(Rank::Queen, Suit::Hearts);
        assert_eq!(stack_position(queen), 5);
        assert_eq!(card_at_position(5), Some(queen));
        assert_eq!(card_at_position(0), None);
        assert_eq!(card_at_position(53), None);
    }

    #[test]
    fn assets_follow_naming_scheme() {
        let assets = preload_assets();
        assert_eq!(assets.len(), DECK_SIZE);
        assert_eq!(assets[0], "cards/as.png");
        assert_eq!(assets[4], "cards/qh.png");
        assert_eq!(BACK_ASSET, asset_path(Card::new(Rank::Ace, Suit::Spades)));
    }
}
