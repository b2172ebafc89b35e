//! Internal modules for the blackjack client.
//!
//! This library provides input parsing, terminal presentation, and the
//! discover-and-play step used by the bj_client binary.

pub mod commands;
pub mod session;
pub mod terminal;
