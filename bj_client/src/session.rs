//! One pass of the client loop: wait for an offer, play that server, and
//! hand back what happened so the caller can report it and listen again.

use blackjack::{
    Client, SessionError, Tally,
    net::{
        client::Presenter,
        discovery::{Discovered, OfferListener},
    },
};
use log::{info, warn};
use std::io;

/// How a session against a discovered server went.
#[derive(Debug)]
pub struct SessionReport {
    pub discovered: Discovered,
    pub rounds: u8,
    /// Rounds finished before the session ended, cleanly or not.
    pub tally: Tally,
    pub outcome: Result<(), SessionError>,
}

/// Block until a valid offer arrives, then make exactly one connection to
/// the advertised server and play it to the end. `choose_rounds` runs after
/// the offer is known and before connecting.
///
/// A failed session is reported in [`SessionReport::outcome`], not as an
/// error; the caller is expected to keep listening.
///
/// # Errors
///
/// Returns an error if the listener fails or `choose_rounds` does.
pub fn play_next_offer<P, F>(
    listener: &OfferListener,
    team_name: &str,
    presenter: &mut P,
    choose_rounds: F,
) -> io::Result<SessionReport>
where
    P: Presenter,
    F: FnOnce(&Discovered, &mut P) -> io::Result<u8>,
{
    let discovered = listener.recv_offer()?;
    let rounds = choose_rounds(&discovered, presenter)?;

    let server = discovered.server_addr();
    info!("playing {rounds} rounds at {server}");
    let mut tally = Tally::default();
    let outcome = Client::connect(&server, team_name, rounds)
        .and_then(|mut client| client.play(rounds, presenter, &mut tally));
    if let Err(error) = &outcome {
        warn!("session with {server} ended early: {error}");
    }

    Ok(SessionReport {
        discovered,
        rounds,
        tally,
        outcome,
    })
}
