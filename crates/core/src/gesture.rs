use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown swipe direction {0:?} (expected U, D, L or R)")]
pub struct DirectionParseError(pub char);

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn code(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_code(code: char) -> Result<Self, DirectionParseError> {
        match code.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            _ => Err(DirectionParseError(code)),
        }
    }

    /// Parse a run of direction letters such as `"URUL"`. Whitespace, commas
    /// and dashes between letters are ignored.
    pub fn parse_sequence(input: &str) -> Result<Vec<Direction>, DirectionParseError> {
        input
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != ',' && *ch != '-')
            .map(Direction::from_code)
            .collect()
    }

    /// Classify a finished drag in screen coordinates (y grows downwards).
    ///
    /// The drag counts once either axis reaches `min_distance`; the larger
    /// axis wins and an exact tie reads as vertical.
    pub fn from_drag(dx: f64, dy: f64, min_distance: f64) -> Option<Direction> {
        if dx.abs() < min_distance && dy.abs() < min_distance {
            return None;
        }
        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

pub fn rank_for(first: Direction, second: Direction) -> Option<Rank> {
    use Direction::*;
    let rank = match (first, second) {
        (Up, Right) => Rank::Ace,
        (Right, Up) => Rank::Two,
        (Right, Right) => Rank::Three,
        (Right, Down) => Rank::Four,
        (Down, Right) => Rank::Five,
        (Down, Down) => Rank::Six,
        (Down, Left) => Rank::Seven,
        (Left, Down) => Rank::Eight,
        (Left, Left) => Rank::Nine,
        (Left, Up) => Rank::Ten,
        (Up, Left) => Rank::Jack,
        (Up, Up) => Rank::Queen,
        (Up, Down) => Rank::King,
        _ => return None,
    };
    Some(rank)
}

pub fn suit_for(direction: Direction) -> Suit {
    match direction {
        Direction::Up => Suit::Spades,
        Direction::Right => Suit::Hearts,
        Direction::Down => Suit::Clubs,
        Direction::Left => Suit::Diamonds,
    }
}

/// Two directions pick the rank, the third picks the suit.
pub fn decode_triplet(triplet: [Direction; 3]) -> Option<Card> {
    let [first, second, third] = triplet;
    let rank = rank_for(first, second)?;
    Some(Card::new(rank, suit_for(third)))
}

/// Inverse of [`decode_triplet`], used for rehearsal help screens.
pub fn encode_card(card: Card) -> [Direction; 3] {
    let (first, second) = Direction::ALL
        .into_iter()
        .flat_map(|a| Direction::ALL.into_iter().map(move |b| (a, b)))
        .find(|(a, b)| rank_for(*a, *b) == Some(card.rank))
        .unwrap_or((Direction::Up, Direction::Up));
    let third = Direction::ALL
        .into_iter()
        .find(|dir| suit_for(*dir) == card.suit)
        .unwrap_or(Direction::Up);
    [first, second, third]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Still collecting; holds the buffer length.
    Buffered(usize),
    Decoded(Card),
    NoMatch([Direction; 3]),
}

/// Collects swipes three at a time. The buffer empties after every third
/// swipe whether or not it decoded.
#[derive(Debug, Default, Clone)]
pub struct SwipeDecoder {
    buffer: Vec<Direction>,
}

impl SwipeDecoder {
    pub fn push(&mut self, direction: Direction) -> SwipeOutcome {
        self.buffer.push(direction);
        if self.buffer.len() < 3 {
            return SwipeOutcome::Buffered(self.buffer.len());
        }
        let triplet = [self.buffer[0], self.buffer[1], self.buffer[2]];
        self.buffer.clear();
        match decode_triplet(triplet) {
            Some(card) => SwipeOutcome::Decoded(card),
            None => SwipeOutcome::NoMatch(triplet),
        }
    }

    pub fn buffered(&self) -> &[Direction] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
