//! UDP discovery: the server's offer beacon and the player's listener.

use anyhow::{Context, Error};
use log::{debug, error, info};
use socket2::{Domain, Protocol, Socket, Type};
use std::{
    io,
    net::{SocketAddr, UdpSocket},
    time::Duration,
};
use tokio::time::{self, MissedTickBehavior};

use super::messages::{Offer, Packet};
use crate::config::TableConfig;

/// Large enough for any datagram we'd care about; oversized junk is
/// truncated and then rejected on length.
const RECV_BUF_LEN: usize = 1024;

/// Broadcasts the same offer at a fixed interval, forever, regardless of
/// how many sessions are running.
pub struct Beacon {
    socket: tokio::net::UdpSocket,
    packet: Vec<u8>,
    target: SocketAddr,
    interval: Duration,
}

impl Beacon {
    /// Bind an ephemeral broadcast-capable socket advertising `tcp_port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket can't be bound or the offer can't be
    /// encoded.
    pub async fn bind(config: &TableConfig, tcp_port: u16) -> Result<Self, Error> {
        let socket = tokio::net::UdpSocket::bind(("0.0.0.0", 0))
            .await
            .context("couldn't bind offer socket")?;
        socket.set_broadcast(true)?;
        let offer = Offer {
            tcp_port,
            server_name: config.server_name.clone(),
        };
        Ok(Self {
            socket,
            packet: offer.encode()?,
            target: config.broadcast_target(),
            interval: config.broadcast_interval,
        })
    }

    /// The encoded offer sent on every tick.
    #[must_use]
    pub fn packet(&self) -> &[u8] {
        &self.packet
    }

    /// Send offers until the task is dropped. Send failures are logged and
    /// retried on the next tick.
    pub async fn run(self) {
        info!("broadcasting offers to {} every {:?}", self.target, self.interval);
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(error) = self.socket.send_to(&self.packet, self.target).await {
                error!("offer broadcast to {} failed: {error}", self.target);
            }
        }
    }
}

/// An offer and the address it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Discovered {
    pub offer: Offer,
    pub source: SocketAddr,
}

impl Discovered {
    /// TCP endpoint of the advertising server.
    #[must_use]
    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.source.ip(), self.offer.tcp_port)
    }
}

/// Blocking listener for offers on the well-known UDP port.
pub struct OfferListener {
    socket: UdpSocket,
}

impl OfferListener {
    /// Bind the well-known port with address (and, on unix, port) reuse so
    /// several players on one host all hear the broadcasts.
    ///
    /// # Errors
    ///
    /// Returns an error if the UDP port is unavailable.
    pub fn bind(config: &TableConfig) -> io::Result<Self> {
        let addr = config.listen_addr();
        let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        #[cfg(all(
            unix,
            not(any(target_os = "solaris", target_os = "illumos", target_os = "cygwin"))
        ))]
        socket.set_reuse_port(true)?;
        socket.bind(&addr.into())?;
        Ok(Self::from(UdpSocket::from(socket)))
    }

    /// # Errors
    ///
    /// Returns an error if the socket has no local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Block until a datagram decodes as a valid offer. Anything else
    /// (wrong cookie, wrong type, wrong size) is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error only if the socket itself fails.
    pub fn recv_offer(&self) -> io::Result<Discovered> {
        let mut buf = [0; RECV_BUF_LEN];
        loop {
            let (len, source) = self.socket.recv_from(&mut buf)?;
            match Offer::decode(&buf[..len]) {
                Ok(offer) => return Ok(Discovered { offer, source }),
                Err(error) => debug!("ignoring datagram from {source}: {error}"),
            }
        }
    }
}

impl From<UdpSocket> for OfferListener {
    fn from(socket: UdpSocket) -> Self {
        Self { socket }
    }
}
