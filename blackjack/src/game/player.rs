//! Player-side mirror of a round.
//!
//! The player never sees the deck. It only tracks what the server has
//! shown so far and knows which update it expects next: three dealt cards,
//! then a decision, then either the result of a hit or the dealer's
//! play-out ending in a final result.

use std::fmt;

use super::{
    RoundError,
    entities::{Card, Decision, Hand, RoundResult, RoundUpdate},
};

/// Number of cards shown before the first decision (two for the player,
/// one dealer up card).
pub const INITIAL_CARDS: u8 = 3;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerPhase {
    Dealing { received: u8 },
    Deciding,
    AwaitingHit,
    AwaitingDealer,
    Finished(RoundResult),
}

impl fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dealing { received } => write!(f, "deal ({received}/{INITIAL_CARDS})"),
            Self::Deciding => write!(f, "decision"),
            Self::AwaitingHit => write!(f, "hit"),
            Self::AwaitingDealer => write!(f, "dealer turn"),
            Self::Finished(result) => write!(f, "finished round ({result})"),
        }
    }
}

/// What the player learned from a single server update.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Observation {
    PlayerCard(Card),
    DealerCard(Card),
    Settled(RoundResult),
}

#[derive(Debug)]
pub struct PlayerRound {
    player: Hand,
    dealer: Hand,
    phase: PlayerPhase,
}

impl Default for PlayerRound {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRound {
    #[must_use]
    pub fn new() -> Self {
        Self {
            player: Hand::new(),
            dealer: Hand::new(),
            phase: PlayerPhase::Dealing { received: 0 },
        }
    }

    #[must_use]
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    #[must_use]
    pub fn player(&self) -> &Hand {
        &self.player
    }

    #[must_use]
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    #[must_use]
    pub fn needs_decision(&self) -> bool {
        self.phase == PlayerPhase::Deciding
    }

    #[must_use]
    pub fn result(&self) -> Option<RoundResult> {
        match self.phase {
            PlayerPhase::Finished(result) => Some(result),
            _ => None,
        }
    }

    /// Record the local decision before it goes on the wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the round isn't waiting on a decision.
    pub fn decide(&mut self, decision: Decision) -> Result<(), RoundError> {
        if self.phase != PlayerPhase::Deciding {
            return Err(RoundError::OutOfPhase {
                phase: self.phase.to_string(),
                event: decision.to_string(),
            });
        }
        self.phase = match decision {
            Decision::Hit => PlayerPhase::AwaitingHit,
            Decision::Stand => PlayerPhase::AwaitingDealer,
        };
        Ok(())
    }

    /// Apply the next server update.
    ///
    /// # Errors
    ///
    /// Returns an error if the update doesn't fit the current phase, e.g. a
    /// final result during the initial deal or any update after the round
    /// finished.
    pub fn receive(&mut self, update: RoundUpdate) -> Result<Vec<Observation>, RoundError> {
        match (self.phase, update.card) {
            (PlayerPhase::Dealing { received }, Some(card)) if !update.is_final() => {
                let observation = if received < INITIAL_CARDS - 1 {
                    self.player.push(card);
                    Observation::PlayerCard(card)
                } else {
                    self.dealer.push(card);
                    Observation::DealerCard(card)
                };
                self.phase = if received + 1 == INITIAL_CARDS {
                    PlayerPhase::Deciding
                } else {
                    PlayerPhase::Dealing {
                        received: received + 1,
                    }
                };
                Ok(vec![observation])
            }
            (PlayerPhase::AwaitingHit, Some(card)) => {
                self.player.push(card);
                let mut observations = vec![Observation::PlayerCard(card)];
                if update.is_final() {
                    self.phase = PlayerPhase::Finished(update.result);
                    observations.push(Observation::Settled(update.result));
                } else {
                    self.phase = PlayerPhase::Deciding;
                }
                Ok(observations)
            }
            (PlayerPhase::AwaitingDealer, card) => {
                let mut observations = Vec::with_capacity(2);
                if let Some(card) = card {
                    self.dealer.push(card);
                    observations.push(Observation::DealerCard(card));
                }
                if update.is_final() {
                    self.phase = PlayerPhase::Finished(update.result);
                    observations.push(Observation::Settled(update.result));
                } else if card.is_none() {
                    return Err(self.unexpected(update));
                }
                Ok(observations)
            }
            _ => Err(self.unexpected(update)),
        }
    }

    fn unexpected(&self, update: RoundUpdate) -> RoundError {
        RoundError::UnexpectedUpdate {
            update,
            phase: self.phase.to_string(),
        }
    }
}
