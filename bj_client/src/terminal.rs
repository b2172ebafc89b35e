//! Line-oriented terminal presentation.
//!
//! Prints each card as the server reveals it along with running totals,
//! and asks the player for hit/stand, re-prompting until the answer makes
//! sense. With a stand-at threshold set it plays on its own instead.

use blackjack::{
    Decision, RoundResult,
    game::player::{Observation, PlayerRound},
    net::client::Presenter,
};
use crossterm::style::Stylize;
use log::{debug, warn};
use std::{
    fmt,
    io::{self, BufRead, Write},
};

use crate::commands::{self, parse_decision};

pub struct Terminal<R, W> {
    input: R,
    output: W,
    stand_at: Option<u16>,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            stand_at: None,
        }
    }

    /// Play without prompting: hit below `stand_at`, stand otherwise.
    #[must_use]
    pub fn with_auto(mut self, stand_at: u16) -> Self {
        self.stand_at = Some(stand_at);
        self
    }

    /// Ask how many rounds to play. Anything unparsable means
    /// [`commands::DEFAULT_ROUNDS`].
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal can't be read or written.
    pub fn ask_rounds(&mut self) -> io::Result<u8> {
        write!(self.output, "How many rounds? ")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(commands::parse_rounds(&line))
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, line: fmt::Arguments<'_>) {
        if let Err(error) = writeln!(self.output, "{line}") {
            debug!("couldn't write to terminal: {error}");
        }
    }

    /// `None` once input is closed.
    fn read_choice(&mut self) -> Option<String> {
        let prompt = write!(self.output, "Hit or Stand? ").and_then(|()| self.output.flush());
        if let Err(error) = prompt {
            debug!("couldn't write to terminal: {error}");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line),
            Err(error) => {
                warn!("couldn't read input: {error}");
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Presenter for Terminal<R, W> {
    fn round_started(&mut self, round: u8, rounds: u8) {
        self.say(format_args!("\n--- Round {round}/{rounds} ---"));
    }

    fn observe(&mut self, round: &PlayerRound, observation: Observation) {
        match observation {
            Observation::PlayerCard(card) => {
                self.say(format_args!("You: {card}"));
                if round.player().len() >= 2 {
                    let sum = format!("Your sum: {}", round.player().value());
                    self.say(format_args!("{}", sum.yellow()));
                }
            }
            Observation::DealerCard(card) => {
                self.say(format_args!("Dealer: {card}"));
                // The first dealer card is shown alone while the other is hidden.
                if round.dealer().len() >= 2 {
                    let sum = format!("Dealer sum: {}", round.dealer().value());
                    self.say(format_args!("{}", sum.yellow()));
                }
            }
            Observation::Settled(result) => {
                let line = match result {
                    RoundResult::PlayerWin => "You won!".green(),
                    RoundResult::HouseWin if round.player().is_bust() => "Bust! You lost.".red(),
                    RoundResult::HouseWin => "Dealer won!".red(),
                    RoundResult::Tie => "It's a tie!".blue(),
                    RoundResult::InProgress => return,
                };
                self.say(format_args!("{line}"));
            }
        }
    }

    fn decide(&mut self, round: &PlayerRound) -> Decision {
        let total = round.player().value();
        if let Some(stand_at) = self.stand_at {
            let decision = if total < stand_at {
                Decision::Hit
            } else {
                Decision::Stand
            };
            self.say(format_args!("Auto: {decision} on {total}"));
            return decision;
        }

        loop {
            let Some(line) = self.read_choice() else {
                // No one left to ask.
                self.say(format_args!("stand"));
                return Decision::Stand;
            };
            match parse_decision(&line) {
                Ok(decision) => return decision,
                Err(error) => self.say(format_args!("{error}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use blackjack::{Card, RoundUpdate, Suit};

    use super::*;

    fn dealt(values: [u8; 3]) -> PlayerRound {
        let mut round = PlayerRound::new();
        for value in values {
            round
                .receive(RoundUpdate::card(Card(value, Suit::Heart)))
                .unwrap();
        }
        round
    }

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn printed(terminal: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(terminal.into_output()).unwrap()
    }

    #[test]
    fn test_invalid_choice_is_reprompted() {
        let round = dealt([10, 6, 9]);
        let mut terminal = terminal("split\n\nHIT\n");
        assert_eq!(terminal.decide(&round), Decision::Hit);

        let out = printed(terminal);
        assert_eq!(out.matches("Hit or Stand? ").count(), 3);
        assert!(out.contains("Invalid input 'split'"));
    }

    #[test]
    fn test_closed_input_stands() {
        let round = dealt([10, 6, 9]);
        let mut terminal = terminal("");
        assert_eq!(terminal.decide(&round), Decision::Stand);
    }

    #[test]
    fn test_auto_stands_at_threshold() {
        let mut terminal = terminal("").with_auto(17);
        assert_eq!(terminal.decide(&dealt([10, 6, 9])), Decision::Hit);
        assert_eq!(terminal.decide(&dealt([10, 7, 9])), Decision::Stand);
    }

    #[test]
    fn test_ask_rounds() {
        let mut terminal = terminal("4\nmany\n");
        assert_eq!(terminal.ask_rounds().unwrap(), 4);
        assert_eq!(terminal.ask_rounds().unwrap(), commands::DEFAULT_ROUNDS);
    }

    #[test]
    fn test_renders_cards_and_totals() {
        let mut round = PlayerRound::new();
        let mut terminal = terminal("");
        for update in [
            RoundUpdate::card(Card(1, Suit::Heart)),
            RoundUpdate::card(Card(13, Suit::Spade)),
            RoundUpdate::card(Card(9, Suit::Club)),
        ] {
            for observation in round.receive(update).unwrap() {
                terminal.observe(&round, observation);
            }
        }

        let out = printed(terminal);
        assert!(out.contains("You: [A♥]"));
        assert!(out.contains("You: [K♠]"));
        assert!(out.contains("Your sum: 21"));
        assert!(out.contains("Dealer: [9♣]"));
        assert!(!out.contains("Dealer sum"));
    }

    #[test]
    fn test_bust_message() {
        let mut round = dealt([10, 13, 7]);
        round.decide(Decision::Hit).unwrap();
        let mut terminal = terminal("");
        let update = RoundUpdate {
            result: RoundResult::HouseWin,
            card: Some(Card(5, Suit::Diamond)),
        };
        for observation in round.receive(update).unwrap() {
            terminal.observe(&round, observation);
        }

        let out = printed(terminal);
        assert!(out.contains("Your sum: 25"));
        assert!(out.contains("Bust! You lost."));
        assert!(!out.contains("Dealer won!"));
    }

    #[test]
    fn test_result_lines() {
        let cases = [
            (RoundResult::PlayerWin, "You won!"),
            (RoundResult::HouseWin, "Dealer won!"),
            (RoundResult::Tie, "It's a tie!"),
        ];
        for (result, expected) in cases {
            let mut round = dealt([10, 8, 9]);
            round.decide(Decision::Stand).unwrap();
            let mut terminal = terminal("");
            for observation in round.receive(RoundUpdate::settled(result)).unwrap() {
                terminal.observe(&round, observation);
            }
            assert!(printed(terminal).contains(expected));
        }
    }
}
