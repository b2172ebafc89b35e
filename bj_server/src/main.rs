//! Blackjack dealer server.
//!
//! Broadcasts offers over UDP and plays every connecting player in its own
//! task until they've had all the rounds they asked for.

mod config;

use std::net::SocketAddr;

use anyhow::Error;
use blackjack::server;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

use config::ServerConfig;

const HELP: &str = "\
Run a blackjack dealer server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     TCP bind address for players  [default: env BJ_TCP_BIND or 0.0.0.0:0]
  --udp-port   PORT        UDP port offers are sent to  [default: env BJ_UDP_PORT or 13122]
  --name       NAME        Server name in offers, max 32 bytes
                           [default: env BJ_SERVER_NAME or Dealer]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BJ_BROADCAST_ADDR        Offer destination address (e.g., 192.168.1.255)
  BJ_BROADCAST_INTERVAL_MS Milliseconds between offers
  BJ_DECISION_TIMEOUT_SECS Seconds to wait on a player before dropping them
  BJ_ROUND_PAUSE_MS        Milliseconds between rounds
  RUST_LOG                 Log filter (e.g., debug)
";

struct Args {
    bind: Option<SocketAddr>,
    udp_port: Option<u16>,
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        udp_port: pargs.opt_value_from_str("--udp-port")?,
        name: pargs.opt_value_from_str("--name")?,
    };

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();

    let config = ServerConfig::from_env(args.bind, args.udp_port, args.name)?;
    config.validate()?;

    let table = config.table;
    info!(
        "Server \"{}\" started, offering on UDP port {} (cookie {:#010x})",
        table.server_name,
        table.udp_port,
        table.cookie()
    );

    server::run(table).await
}
