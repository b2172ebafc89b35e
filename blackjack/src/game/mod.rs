//! Blackjack game engine.
//!
//! This module provides everything both peers need to agree on a round:
//! - Cards, the single-use deck, and hands
//! - Hand scoring
//! - The dealer's per-round state machine (server side)
//! - The player's per-round state machine (client side)

pub mod constants;
pub mod dealer;
pub mod entities;
pub mod functional;
pub mod player;

mod errors;
pub use errors::RoundError;
