//! Scoring thresholds shared by both peers.

/// Any hand valued above this is bust.
pub const BUST_LIMIT: u16 = 21;

/// The dealer keeps drawing while below this total.
pub const DEALER_STANDS_AT: u16 = 17;

/// Aces always count high.
pub const ACE_VALUE: u16 = 11;

/// Tens and face cards.
pub const FACE_VALUE: u16 = 10;
