use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn code(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_lowercase() {
            's' => Some(Suit::Spades),
            'h' => Some(Suit::Hearts),
            'c' => Some(Suit::Clubs),
            'd' => Some(Suit::Diamonds),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Single-character rank code. Ten is `x` so every code stays two characters.
    pub fn code(self) -> char {
        match self {
            Rank::Ace => 'a',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'x',
            Rank::Jack => 'j',
            Rank::Queen => 'q',
            Rank::King => 'k',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Rank::ALL.into_iter().find(|rank| rank.code() == code)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Lowercase two-character code, e.g. `qh`.
    pub fn code(&self) -> String {
        let mut out = String::with_capacity(2);
        out.push(self.rank.code());
        out.push(self.suit.code());
        out
    }

    /// Uppercase code as shown on the stealth indicator, e.g. `QH`.
    pub fn label(&self) -> String {
        self.code().to_ascii_uppercase()
    }

    /// Human-facing face, e.g. `Q♥`, with ten written out as `10`.
    pub fn pretty(&self) -> String {
        let rank = match self.rank {
            Rank::Ten => "10".to_string(),
            other => other.code().to_ascii_uppercase().to_string(),
        };
        format!("{rank}{}", self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardParseError {
    #[error("card code must be two characters, got {0:?}")]
    Length(String),
    #[error("unknown rank {0:?}")]
    Rank(char),
    #[error("unknown suit {0:?}")]
    Suit(char),
}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(CardParseError::Length(trimmed.to_string()));
        };
        let rank = Rank::from_code(rank).ok_or(CardParseError::Rank(rank))?;
        let suit = Suit::from_code(suit).ok_or(CardParseError::Suit(suit))?;
        Ok(Card::new(rank, suit))
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.code()
    }
}

impl TryFrom<String> for Card {
    type Error = CardParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_two_lowercase_chars() {
        let card = Card::new(Rank::Queen, Suit::Hearts);
        assert_eq!(card.code(), "qh");
        assert_eq!(card.label(), "QH");
        assert_eq!(card.to_string(), "qh");
        assert_eq!(Card::new(Rank::Ten, Suit::Clubs).code(), "xc");
    }

    #[test]
    fn parse_accepts_either_case() {
        assert_eq!("AD".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Diamonds)));
        assert_eq!(" xs ".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Spades)));
    }

    #[test]
    fn parse_rejects_bad_codes() {
        assert_eq!(
            "10h".parse::<Card>(),
            Err(CardParseError::Length("10h".to_string()))
        );
        assert_eq!("zh".parse::<Card>(), Err(CardParseError::Rank('z')));
        assert_eq!("qx".parse::<Card>(), Err(CardParseError::Suit('x')));
        assert!("".parse::<Card>().is_err());
    }

    #[test]
    fn pretty_spells_out_ten() {
        assert_eq!(Card::new(Rank::Ten, Suit::Hearts).pretty(), "10♥");
        assert_eq!(Card::new(Rank::King, Suit::Spades).pretty(), "K♠");
    }

    #[test]
    fn serializes_as_code() {
        let card = Card::new(Rank::Seven, Suit::Diamonds);
        let json = serde_json::to_string(&card).expect("serialize");
        assert_eq!(json, "\"7d\"");
        let back: Card = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, card);
    }
}
