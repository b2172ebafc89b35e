//! Multi-session TCP server.
//!
//! Each accepted connection gets its own task and its own [`Session`];
//! sessions share nothing but the read-only [`TableConfig`]. A session
//! failing (bad packet, timeout, hang-up) ends that task only.

use anyhow::{Context, Error};
use log::{debug, info, warn};
use std::{net::SocketAddr, sync::Arc};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
    time,
};

use super::{
    discovery::Beacon,
    errors::SessionError,
    messages::{Packet, Request},
    utils,
};
use crate::{
    config::TableConfig,
    game::{
        RoundError,
        dealer::{DealerEvent, DealerPhase, DealerRound},
        entities::{Deck, Decision, RoundResult, RoundUpdate, Tally},
    },
};

/// One player's connection, from handshake through the last round.
pub struct Session<S> {
    stream: S,
    peer: SocketAddr,
    config: Arc<TableConfig>,
    team_name: Option<String>,
    tally: Tally,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    pub fn new(stream: S, peer: SocketAddr, config: Arc<TableConfig>) -> Self {
        Self {
            stream,
            peer,
            config,
            team_name: None,
            tally: Tally::default(),
        }
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        self.tally
    }

    #[must_use]
    pub fn team_name(&self) -> Option<&str> {
        self.team_name.as_deref()
    }

    /// Play every requested round with a fresh deck each time.
    ///
    /// # Errors
    ///
    /// Returns the first error that ends the session. Rounds finished
    /// before the error are still counted in [`Session::tally`].
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let request = self.handshake().await?;
        for round in 1..=request.rounds {
            debug!("{}: round {round}/{}", self.peer, request.rounds);
            let result = self.play_round(Deck::new()).await?;
            self.tally.record(result);
            info!(
                "{}: {} round {round}/{}: {result}",
                self.peer, request.team_name, request.rounds
            );
            time::sleep(self.config.round_pause).await;
        }
        Ok(())
    }

    /// Read the opening request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is malformed, late, or never comes.
    pub async fn handshake(&mut self) -> Result<Request, SessionError> {
        let request: Request = self.recv().await?;
        info!(
            "{}: team {} connected for {} rounds",
            self.peer, request.team_name, request.rounds
        );
        self.team_name = Some(request.team_name.clone());
        Ok(request)
    }

    /// Drive a single round to settlement using `deck`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player sends anything but a valid decision,
    /// doesn't answer in time, or disconnects.
    pub async fn play_round(&mut self, deck: Deck) -> Result<RoundResult, SessionError> {
        let mut round = DealerRound::new(deck);
        let updates = round.step(DealerEvent::Deal)?;
        self.send_all(&updates).await?;

        while round.phase() == DealerPhase::PlayerTurn {
            let decision: Decision = self.recv().await?;
            debug!("{}: {decision} on {}", self.peer, round.player().value());
            let updates = round.step(DealerEvent::Decision(decision))?;
            self.send_all(&updates).await?;
        }

        if round.phase() == DealerPhase::DealerTurn {
            let updates = round.step(DealerEvent::PlayOut)?;
            self.send_all(&updates).await?;
        }

        match round.phase() {
            DealerPhase::Settled(result) => Ok(result),
            phase => Err(RoundError::OutOfPhase {
                phase: phase.to_string(),
                event: "settle".to_string(),
            }
            .into()),
        }
    }

    async fn recv<T: Packet>(&mut self) -> Result<T, SessionError> {
        let deadline = self.config.decision_timeout;
        time::timeout(deadline, utils::read_packet_async(&mut self.stream))
            .await
            .map_err(|_| SessionError::Timeout(deadline))?
    }

    async fn send_all(&mut self, updates: &[RoundUpdate]) -> Result<(), SessionError> {
        for update in updates {
            utils::write_packet_async(&mut self.stream, update).await?;
        }
        Ok(())
    }
}

/// Accept connections forever, one task per connection.
pub async fn accept(listener: TcpListener, config: Arc<TableConfig>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(connection) => connection,
            Err(error) => {
                warn!("accept failed: {error}");
                continue;
            }
        };
        info!("connection from {peer}");
        let config = Arc::clone(&config);
        tokio::spawn(async move {
            let mut session = Session::new(stream, peer, config);
            let outcome = session.run().await;
            let team = session.team_name().unwrap_or("unknown team").to_string();
            match outcome {
                Ok(()) => info!("{peer}: {team} done. {}", session.tally()),
                Err(error) => warn!("{peer}: {team} aborted: {error}. {}", session.tally()),
            }
        });
    }
}

/// Bind the acceptor, start the beacon advertising its port, and serve
/// until the process exits.
///
/// # Errors
///
/// Returns an error if either socket can't be set up.
pub async fn run(config: TableConfig) -> Result<(), Error> {
    let listener = TcpListener::bind(config.tcp_bind)
        .await
        .with_context(|| format!("couldn't bind {}", config.tcp_bind))?;
    let tcp_port = listener.local_addr()?.port();
    info!("listening for players on TCP port {tcp_port}");

    let beacon = Beacon::bind(&config, tcp_port).await?;
    tokio::spawn(beacon.run());

    accept(listener, Arc::new(config)).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    use super::*;
    use crate::game::entities::{Card, Suit};

    fn c(value: u8) -> Card {
        Card(value, Suit::Diamond)
    }

    fn stacked(draws: &[Card]) -> Deck {
        draws.iter().rev().copied().collect::<Vec<_>>().into()
    }

    fn session(stream: DuplexStream) -> Session<DuplexStream> {
        let config = TableConfig {
            decision_timeout: Duration::from_millis(200),
            round_pause: Duration::ZERO,
            ..TableConfig::default()
        };
        Session::new(stream, "127.0.0.1:9".parse().unwrap(), Arc::new(config))
    }

    async fn send(stream: &mut DuplexStream, decision: Decision) {
        stream.write_all(&decision.encode().unwrap()).await.unwrap();
    }

    async fn recv_updates(stream: &mut DuplexStream, count: usize) -> Vec<RoundUpdate> {
        let mut updates = Vec::with_capacity(count);
        for _ in 0..count {
            updates.push(utils::read_packet_async(stream).await.unwrap());
        }
        updates
    }

    #[tokio::test]
    async fn test_player_bust_skips_dealer() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        // Player 10 + K = 20, dealer 7 + hidden 9, player hits a 5.
        let deck = stacked(&[c(10), c(13), c(7), c(9), c(5)]);

        send(&mut player, Decision::Hit).await;
        let result = session.play_round(deck).await.unwrap();
        drop(session);

        assert_eq!(result, RoundResult::HouseWin);
        let updates = recv_updates(&mut player, 4).await;
        assert_eq!(
            updates[3],
            RoundUpdate {
                result: RoundResult::HouseWin,
                card: Some(c(5)),
            }
        );
        // Nothing follows the busting card.
        let mut rest = Vec::new();
        player.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_stand_and_dealer_busts() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let deck = stacked(&[c(10), c(13), c(6), c(10), c(8)]);

        send(&mut player, Decision::Stand).await;
        let result = session.play_round(deck).await.unwrap();
        session.tally.record(result);

        let updates = recv_updates(&mut player, 6).await;
        assert_eq!(updates[3], RoundUpdate::card(c(10)));
        assert_eq!(updates[4], RoundUpdate::card(c(8)));
        assert_eq!(updates[5], RoundUpdate::settled(RoundResult::PlayerWin));
        assert_eq!(session.tally().wins, 1);
    }

    #[tokio::test]
    async fn test_stand_and_tie() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let deck = stacked(&[c(10), c(13), c(12), c(10)]);

        send(&mut player, Decision::Stand).await;
        let result = session.play_round(deck).await.unwrap();
        session.tally.record(result);

        let updates = recv_updates(&mut player, 5).await;
        assert_eq!(updates[4], RoundUpdate::settled(RoundResult::Tie));
        assert_eq!(session.tally().wins, 0);
        assert_eq!(session.tally().ties, 1);
    }

    #[tokio::test]
    async fn test_unknown_decision_aborts() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let mut bogus = Decision::Hit.encode().unwrap();
        bogus[5..].copy_from_slice(b"Split");
        player.write_all(&bogus).await.unwrap();

        let error = session.play_round(Deck::new()).await.unwrap_err();
        assert!(matches!(error, SessionError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_silent_player_times_out() {
        let (_player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let error = session.play_round(Deck::new()).await.unwrap_err();
        assert!(matches!(error, SessionError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_disconnect_mid_round() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        player.write_all(&[0xab, 0xcd]).await.unwrap();
        drop(player);
        let error = session.play_round(Deck::new()).await.unwrap_err();
        assert!(matches!(error, SessionError::ConnectionLost(_)));
    }

    #[tokio::test]
    async fn test_handshake_rejects_wrong_cookie() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let mut request = Request {
            rounds: 2,
            team_name: "Bob".to_string(),
        }
        .encode()
        .unwrap();
        request[3] = 0;
        player.write_all(&request).await.unwrap();

        assert!(matches!(session.run().await, Err(SessionError::Malformed(_))));
        assert_eq!(session.team_name(), None);
    }

    #[tokio::test]
    async fn test_zero_rounds_ends_session() {
        let (mut player, server) = tokio::io::duplex(256);
        let mut session = session(server);
        let request = Request {
            rounds: 0,
            team_name: "Bob".to_string(),
        };
        utils::write_packet_async(&mut player, &request).await.unwrap();

        session.run().await.unwrap();
        assert_eq!(session.tally().played, 0);
        assert_eq!(session.team_name(), Some("Bob"));
    }
}
