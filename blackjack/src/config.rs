//! Table configuration shared by the beacon, the acceptor, every session,
//! and the player's offer listener.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use crate::net::messages::MAGIC_COOKIE;

/// Well-known UDP port offers are broadcast on.
pub const DEFAULT_UDP_PORT: u16 = 13122;
pub const DEFAULT_BROADCAST_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_ROUND_PAUSE: Duration = Duration::from_millis(500);
pub const DEFAULT_SERVER_NAME: &str = "Dealer";

/// Immutable settings, built once at startup and handed to whoever needs
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Address the TCP acceptor binds to. Port 0 lets the OS pick one; the
    /// actual port is what gets advertised.
    pub tcp_bind: SocketAddr,

    /// UDP port offers are sent to and listened on
    pub udp_port: u16,

    /// Destination address for offers (the limited broadcast address by
    /// default)
    pub broadcast_addr: IpAddr,

    /// Time between two offers
    pub broadcast_interval: Duration,

    /// How long a session waits on the player before giving up
    pub decision_timeout: Duration,

    /// Pause between rounds
    pub round_pause: Duration,

    /// Name advertised in offers
    pub server_name: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            tcp_bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            udp_port: DEFAULT_UDP_PORT,
            broadcast_addr: IpAddr::V4(Ipv4Addr::BROADCAST),
            broadcast_interval: DEFAULT_BROADCAST_INTERVAL,
            decision_timeout: DEFAULT_DECISION_TIMEOUT,
            round_pause: DEFAULT_ROUND_PAUSE,
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }
}

impl TableConfig {
    /// Protocol cookie. Fixed by the wire format, exposed for logging.
    #[must_use]
    pub const fn cookie(&self) -> u32 {
        MAGIC_COOKIE
    }

    #[must_use]
    pub fn broadcast_target(&self) -> SocketAddr {
        SocketAddr::new(self.broadcast_addr, self.udp_port)
    }

    /// Where the player's listener binds.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.udp_port)
    }
}
