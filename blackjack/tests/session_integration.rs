/// Integration tests for full sessions over real sockets
///
/// These tests run the real acceptor on loopback and play it with the
/// blocking client, including several players at once.
use std::{net::SocketAddr, sync::Arc, time::Duration};

use blackjack::{
    Client, Decision, SessionError, Tally, TableConfig,
    game::player::{Observation, PlayerRound},
    net::{client::Presenter, discovery::OfferListener, server},
};
use tokio::net::TcpListener;

/// Hits below 17, like the house.
struct HouseRules {
    rounds_started: u8,
    observations: usize,
}

impl HouseRules {
    fn new() -> Self {
        Self {
            rounds_started: 0,
            observations: 0,
        }
    }
}

impl Presenter for HouseRules {
    fn round_started(&mut self, _round: u8, _rounds: u8) {
        self.rounds_started += 1;
    }

    fn observe(&mut self, _round: &PlayerRound, _observation: Observation) {
        self.observations += 1;
    }

    fn decide(&mut self, round: &PlayerRound) -> Decision {
        if round.player().value() < 17 {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

fn test_config() -> TableConfig {
    TableConfig {
        tcp_bind: "127.0.0.1:0".parse().unwrap(),
        decision_timeout: Duration::from_secs(5),
        round_pause: Duration::from_millis(1),
        ..TableConfig::default()
    }
}

async fn start_server() -> SocketAddr {
    let config = test_config();
    let listener = TcpListener::bind(config.tcp_bind).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::accept(listener, Arc::new(config)));
    addr
}

fn play_session(addr: SocketAddr, name: &str, rounds: u8) -> (Tally, HouseRules) {
    let mut client = Client::connect(&addr, name, rounds).unwrap();
    let mut presenter = HouseRules::new();
    let mut tally = Tally::default();
    client.play(rounds, &mut presenter, &mut tally).unwrap();
    (tally, presenter)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_session() {
    let addr = start_server().await;

    let (tally, presenter) = tokio::task::spawn_blocking(move || play_session(addr, "Bob", 5))
        .await
        .unwrap();

    assert_eq!(tally.played, 5);
    assert_eq!(tally.wins + tally.ties + tally.losses, 5);
    assert_eq!(presenter.rounds_started, 5);
    // At least three dealt cards and a result per round.
    assert!(presenter.observations >= 5 * 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sessions_are_isolated() {
    let addr = start_server().await;

    let players: Vec<_> = (0..8u8)
        .map(|i| {
            tokio::task::spawn_blocking(move || play_session(addr, &format!("team{i}"), i + 1))
        })
        .collect();

    for (i, player) in players.into_iter().enumerate() {
        let (tally, _) = player.await.unwrap();
        assert_eq!(tally.played as usize, i + 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_broken_session_does_not_affect_others() {
    let addr = start_server().await;

    // A peer that speaks garbage and hangs up.
    let mut rogue = tokio::net::TcpStream::connect(addr).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut rogue, b"not a request at all, just noise!!!!!!")
        .await
        .unwrap();
    drop(rogue);

    let (tally, _) = tokio::task::spawn_blocking(move || play_session(addr, "Alice", 3))
        .await
        .unwrap();
    assert_eq!(tally.played, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_sees_server_hangup() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept the connection and close it without dealing.
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let (error, tally) = tokio::task::spawn_blocking(move || {
        let mut tally = Tally::default();
        let error = Client::connect(&addr, "Bob", 2)
            .and_then(|mut client| client.play(2, &mut HouseRules::new(), &mut tally))
            .unwrap_err();
        (error, tally)
    })
    .await
    .unwrap();

    assert!(matches!(error, SessionError::ConnectionLost(_)));
    assert_eq!(tally.played, 0);
    assert_eq!(tally.win_rate(), 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_discovery_then_session() {
    let listener = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let udp_port = listener.local_addr().unwrap().port();
    let offers = OfferListener::from(listener);

    let config = TableConfig {
        udp_port,
        broadcast_addr: "127.0.0.1".parse().unwrap(),
        broadcast_interval: Duration::from_millis(20),
        ..test_config()
    };
    tokio::spawn(server::run(config));

    let tally = tokio::task::spawn_blocking(move || {
        let discovered = offers.recv_offer().unwrap();
        assert_eq!(discovered.offer.server_name, "Dealer");
        play_session(discovered.server_addr(), "Carol", 2).0
    })
    .await
    .unwrap();

    assert_eq!(tally.played, 2);
}
