//! # Blackjack
//!
//! A two-party blackjack protocol: one server acting as the house plays
//! many concurrent players, each for the number of rounds they ask for.
//!
//! ## Architecture
//!
//! - **Discovery**: the server broadcasts an offer over UDP; a player picks
//!   it up and connects over TCP.
//! - **Session**: the player sends a request with a round count, then each
//!   round runs the dealer's state machine on the server and a mirror of it
//!   on the player:
//!
//!   ```text
//!   DealtInitial -> PlayerTurn -> DealerTurn -> Settled
//!   ```
//!
//!   A bust during the player turn settles the round immediately.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, deck, scoring, and both round state machines
//! - [`net`]: packet codec, discovery, server and client drivers
//! - [`config`]: immutable table settings
//!
//! ## Example
//!
//! ```
//! use blackjack::{Deck, functional::hand_value};
//!
//! let mut deck = Deck::new();
//! let hand = [deck.draw().unwrap(), deck.draw().unwrap()];
//! assert!(hand_value(&hand) <= 22);
//! ```

/// Immutable table settings.
pub mod config;
pub use config::TableConfig;

/// Core game logic, entities, and state machines.
pub mod game;
pub use game::{
    RoundError, constants,
    entities::{
        self, Card, Deck, Decision, EmptyDeckError, Hand, RoundResult, RoundUpdate, Suit, Tally,
    },
    functional,
};

/// Networking components for discovery and client-server play.
pub mod net;
pub use net::{client::Client, errors::SessionError, messages, server};
