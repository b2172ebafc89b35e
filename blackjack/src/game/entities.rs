use rand::{rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{constants::BUST_LIMIT, functional};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Heart,
    Diamond,
    Club,
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Heart, Suit::Diamond, Suit::Club, Suit::Spade];

    /// Suit for its wire index (0 = hearts ... 3 = spades).
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card ranks.
pub type Value = u8;

pub const MIN_VALUE: Value = 1;
pub const MAX_VALUE: Value = 13;

/// A card is a tuple of a rank (ace=1u8 ... king=13u8) and a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    /// Build a card from its wire fields, rejecting ranks outside 1..=13
    /// and suits outside 0..=3.
    #[must_use]
    pub fn from_wire(rank: u16, suit: u8) -> Option<Self> {
        let value = Value::try_from(rank).ok()?;
        if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
            return None;
        }
        Some(Self(value, Suit::from_index(suit)?))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        write!(f, "[{value}{}]", self.1)
    }
}

pub const DECK_SIZE: usize = 52;

/// Drawing from a deck that has handed out all of its cards.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("deck exhausted after {DECK_SIZE} draws")]
pub struct EmptyDeckError;

/// A single-use shoe of 52 unique cards. Cards are drawn from the back, so
/// a deck built from a known sequence deals that sequence in reverse.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled deck holding every rank/suit pair exactly once.
    #[must_use]
    pub fn new() -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(&mut rng());
        deck
    }

    /// All 52 cards sorted by rank, then suit.
    #[must_use]
    pub fn ordered() -> Self {
        let cards = (MIN_VALUE..=MAX_VALUE)
            .flat_map(|value| Suit::ALL.into_iter().map(move |suit| Card(value, suit)))
            .collect();
        Self { cards }
    }

    pub fn draw(&mut self) -> Result<Card, EmptyDeckError> {
        self.cards.pop().ok_or(EmptyDeckError)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack a deck with a known order. The last card in the vector is the
/// first one drawn.
impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

/// Cards held by one party for the current round, in the order received.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn value(&self) -> u16 {
        functional::hand_value(&self.cards)
    }

    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > BUST_LIMIT
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Result code carried by every server payload. Anything other than
/// `InProgress` closes the round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum RoundResult {
    InProgress,
    Tie,
    HouseWin,
    PlayerWin,
}

impl RoundResult {
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::InProgress),
            1 => Some(Self::Tie),
            2 => Some(Self::HouseWin),
            3 => Some(Self::PlayerWin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::Tie => 1,
            Self::HouseWin => 2,
            Self::PlayerWin => 3,
        }
    }

    #[must_use]
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InProgress => "in progress",
            Self::Tie => "tie",
            Self::HouseWin => "house wins",
            Self::PlayerWin => "player wins",
        };
        write!(f, "{repr}")
    }
}

/// A player's move during their turn.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Decision {
    Hit,
    Stand,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
        };
        write!(f, "{repr}")
    }
}

/// One step of a round as seen by the player: a card, a final result, or a
/// busting card that carries the final result with it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoundUpdate {
    pub result: RoundResult,
    pub card: Option<Card>,
}

impl RoundUpdate {
    #[must_use]
    pub const fn card(card: Card) -> Self {
        Self {
            result: RoundResult::InProgress,
            card: Some(card),
        }
    }

    #[must_use]
    pub const fn settled(result: RoundResult) -> Self {
        Self { result, card: None }
    }

    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.result.is_final()
    }
}

impl fmt::Display for RoundUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.card {
            Some(card) => write!(f, "{card} ({})", self.result),
            None => write!(f, "{}", self.result),
        }
    }
}

/// Running record of finished rounds within one session.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tally {
    pub played: u32,
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

impl Tally {
    pub fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::InProgress => return,
            RoundResult::Tie => self.ties += 1,
            RoundResult::HouseWin => self.losses += 1,
            RoundResult::PlayerWin => self.wins += 1,
        }
        self.played += 1;
    }

    /// Wins over rounds played, or zero if nothing finished.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / f64::from(self.played)
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Finished playing {} rounds, win rate: {:.2}",
            self.played,
            self.win_rate()
        )
    }
}
