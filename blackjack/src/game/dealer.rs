//! Server-authoritative round state machine.
//!
//! A round only ever moves forward:
//!
//! ```text
//! DealtInitial -> PlayerTurn -> DealerTurn -> Settled
//!                      |                         ^
//!                      +-------- (bust) ---------+
//! ```
//!
//! Every transition goes through [`DealerRound::step`], which returns the
//! updates that must be sent to the player, in order.

use log::debug;
use std::fmt;

use super::{
    RoundError,
    constants::DEALER_STANDS_AT,
    entities::{Card, Deck, Decision, Hand, RoundResult, RoundUpdate},
    functional,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DealerPhase {
    /// Initial deal is drawn on the first step.
    DealtInitial,
    /// Waiting on hit/stand decisions.
    PlayerTurn,
    /// Player stood; the hidden card and dealer draws are pending.
    DealerTurn,
    Settled(RoundResult),
}

impl DealerPhase {
    const fn ordinal(self) -> u8 {
        match self {
            Self::DealtInitial => 0,
            Self::PlayerTurn => 1,
            Self::DealerTurn => 2,
            Self::Settled(_) => 3,
        }
    }

    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

impl fmt::Display for DealerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DealtInitial => write!(f, "initial deal"),
            Self::PlayerTurn => write!(f, "player turn"),
            Self::DealerTurn => write!(f, "dealer turn"),
            Self::Settled(result) => write!(f, "settled ({result})"),
        }
    }
}

/// Inputs that drive a [`DealerRound`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DealerEvent {
    Deal,
    Decision(Decision),
    PlayOut,
}

impl fmt::Display for DealerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deal => write!(f, "deal"),
            Self::Decision(decision) => write!(f, "{decision}"),
            Self::PlayOut => write!(f, "play out the dealer"),
        }
    }
}

/// One round between the house and a single player.
#[derive(Debug)]
pub struct DealerRound {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    /// Dealer's second card, withheld until the dealer turn.
    hidden: Option<Card>,
    phase: DealerPhase,
}

impl DealerRound {
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
            hidden: None,
            phase: DealerPhase::DealtInitial,
        }
    }

    #[must_use]
    pub fn phase(&self) -> DealerPhase {
        self.phase
    }

    #[must_use]
    pub fn player(&self) -> &Hand {
        &self.player
    }

    /// Dealer cards that have been revealed so far.
    #[must_use]
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    #[must_use]
    pub fn result(&self) -> Option<RoundResult> {
        match self.phase {
            DealerPhase::Settled(result) => Some(result),
            _ => None,
        }
    }

    /// Advance the round by one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event isn't valid for the current phase or
    /// if the deck runs dry.
    pub fn step(&mut self, event: DealerEvent) -> Result<Vec<RoundUpdate>, RoundError> {
        match (self.phase, event) {
            (DealerPhase::DealtInitial, DealerEvent::Deal) => self.deal(),
            (DealerPhase::PlayerTurn, DealerEvent::Decision(Decision::Hit)) => self.hit(),
            (DealerPhase::PlayerTurn, DealerEvent::Decision(Decision::Stand)) => {
                self.enter(DealerPhase::DealerTurn)?;
                Ok(Vec::new())
            }
            (DealerPhase::DealerTurn, DealerEvent::PlayOut) => self.play_out(),
            (phase, event) => Err(RoundError::OutOfPhase {
                phase: phase.to_string(),
                event: event.to_string(),
            }),
        }
    }

    fn enter(&mut self, next: DealerPhase) -> Result<(), RoundError> {
        if next.ordinal() <= self.phase.ordinal() {
            return Err(RoundError::BackwardTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        self.phase = next;
        Ok(())
    }

    fn deal(&mut self) -> Result<Vec<RoundUpdate>, RoundError> {
        let mut updates = Vec::with_capacity(3);
        for _ in 0..2 {
            let card = self.deck.draw()?;
            self.player.push(card);
            updates.push(RoundUpdate::card(card));
        }
        let up_card = self.deck.draw()?;
        self.dealer.push(up_card);
        updates.push(RoundUpdate::card(up_card));

        self.hidden = Some(self.deck.draw()?);
        self.enter(DealerPhase::PlayerTurn)?;
        debug!("dealt {} against {}", self.player, self.dealer);
        Ok(updates)
    }

    fn hit(&mut self) -> Result<Vec<RoundUpdate>, RoundError> {
        let card = self.deck.draw()?;
        self.player.push(card);
        if self.player.is_bust() {
            debug!("player bust with {} ({})", self.player, self.player.value());
            self.enter(DealerPhase::Settled(RoundResult::HouseWin))?;
            return Ok(vec![RoundUpdate {
                result: RoundResult::HouseWin,
                card: Some(card),
            }]);
        }
        Ok(vec![RoundUpdate::card(card)])
    }

    fn play_out(&mut self) -> Result<Vec<RoundUpdate>, RoundError> {
        let mut updates = Vec::new();
        if let Some(hidden) = self.hidden.take() {
            self.dealer.push(hidden);
            updates.push(RoundUpdate::card(hidden));
        }
        while self.dealer.value() < DEALER_STANDS_AT {
            let card = self.deck.draw()?;
            self.dealer.push(card);
            updates.push(RoundUpdate::card(card));
        }

        let result = functional::settle(self.player.value(), self.dealer.value());
        debug!(
            "dealer stands on {} ({}) against {}: {result}",
            self.dealer,
            self.dealer.value(),
            self.player.value()
        );
        self.enter(DealerPhase::Settled(result))?;
        updates.push(RoundUpdate::settled(result));
        Ok(updates)
    }
}
