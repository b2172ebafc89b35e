//! A blocking TCP blackjack client.
//!
//! The client plays one session at a time: send the request, then play
//! each round through a [`PlayerRound`], asking a [`Presenter`] for
//! decisions and handing it everything the server reveals.

use log::{debug, info};
use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpStream},
};

use super::{errors::SessionError, messages::Request, utils};
use crate::game::{
    entities::{Decision, RoundResult, RoundUpdate, Tally},
    player::{Observation, PlayerRound},
};

/// The human (or bot) side of a session: shows what happens and picks
/// hit or stand.
pub trait Presenter {
    fn round_started(&mut self, _round: u8, _rounds: u8) {}

    fn observe(&mut self, round: &PlayerRound, observation: Observation);

    /// Only called when the round is waiting on a decision. Input
    /// validation happens here; only a valid [`Decision`] is ever sent.
    fn decide(&mut self, round: &PlayerRound) -> Decision;
}

pub struct Client<S> {
    /// Team name sent in the request.
    pub team_name: String,
    /// The underlying stream.
    pub stream: S,
}

impl Client<TcpStream> {
    /// Connect to a server and request `rounds` rounds. No read timeout is
    /// set; the server paces the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the request fails.
    pub fn connect(addr: &SocketAddr, team_name: &str, rounds: u8) -> Result<Self, SessionError> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let mut client = Self {
            team_name: team_name.to_string(),
            stream,
        };
        client.request(rounds)?;
        Ok(client)
    }
}

impl<S: Read + Write> Client<S> {
    pub fn new(team_name: &str, stream: S) -> Self {
        Self {
            team_name: team_name.to_string(),
            stream,
        }
    }

    /// Send the opening request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request can't be written.
    pub fn request(&mut self, rounds: u8) -> Result<(), SessionError> {
        let request = Request {
            rounds,
            team_name: self.team_name.clone(),
        };
        utils::write_packet(&mut self.stream, &request)
    }

    /// Play `rounds` rounds, recording each result in `tally` as it
    /// finishes so the caller can report it even if the session dies.
    ///
    /// # Errors
    ///
    /// Returns the first error that ends the session.
    pub fn play<P: Presenter>(
        &mut self,
        rounds: u8,
        presenter: &mut P,
        tally: &mut Tally,
    ) -> Result<(), SessionError> {
        for round in 1..=rounds {
            presenter.round_started(round, rounds);
            let result = self.play_round(presenter)?;
            tally.record(result);
            info!("round {round}/{rounds}: {result}");
        }
        Ok(())
    }

    /// Play a single round to its final result.
    ///
    /// # Errors
    ///
    /// Returns an error if the server disconnects or sends something that
    /// doesn't fit the round.
    pub fn play_round<P: Presenter>(
        &mut self,
        presenter: &mut P,
    ) -> Result<RoundResult, SessionError> {
        let mut round = PlayerRound::new();
        loop {
            if let Some(result) = round.result() {
                return Ok(result);
            }
            if round.needs_decision() {
                let decision = presenter.decide(&round);
                round.decide(decision)?;
                debug!("sending {decision} on {}", round.player().value());
                utils::write_packet(&mut self.stream, &decision)?;
            } else {
                let update: RoundUpdate = utils::read_packet(&mut self.stream)?;
                for observation in round.receive(update)? {
                    presenter.observe(&round, observation);
                }
            }
        }
    }
}
