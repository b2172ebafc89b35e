//! Errors raised while advancing a round.

use thiserror::Error;

use super::entities::{EmptyDeckError, RoundUpdate};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error(transparent)]
    EmptyDeck(#[from] EmptyDeckError),
    #[error("can't {event} during {phase}")]
    OutOfPhase { phase: String, event: String },
    #[error("illegal transition from {from} to {to}")]
    BackwardTransition { from: String, to: String },
    #[error("unexpected update {update} during {phase}")]
    UnexpectedUpdate { update: RoundUpdate, phase: String },
}
