//! Pure scoring functions.

use super::{
    constants::{ACE_VALUE, BUST_LIMIT, FACE_VALUE},
    entities::{Card, RoundResult},
};

/// Point value of a single card. An ace is always 11; there is no soft
/// total.
#[must_use]
pub fn card_value(card: &Card) -> u16 {
    match card.0 {
        1 => ACE_VALUE,
        v if u16::from(v) >= FACE_VALUE => FACE_VALUE,
        v => u16::from(v),
    }
}

/// Sum of card values. Callers compare against [`BUST_LIMIT`] themselves.
#[must_use]
pub fn hand_value(cards: &[Card]) -> u16 {
    cards.iter().map(card_value).sum()
}

/// Outcome of a round in which the player stood without busting.
#[must_use]
pub fn settle(player_total: u16, dealer_total: u16) -> RoundResult {
    if dealer_total > BUST_LIMIT || player_total > dealer_total {
        RoundResult::PlayerWin
    } else if dealer_total > player_total {
        RoundResult::HouseWin
    } else {
        RoundResult::Tie
    }
}
