//! A blackjack client for dealers on the local network.
//!
//! The client waits for a server offer, plays one session against that
//! server, reports the win rate, and goes back to waiting.

use anyhow::{Context, Error};
use blackjack::{TableConfig, constants::DEALER_STANDS_AT, net::discovery::OfferListener};
use pico_args::Arguments;
use std::io;

use bj_client::{session::play_next_offer, terminal::Terminal};

const DEFAULT_TEAM_NAME: &str = "ThunderCobras";

const HELP: &str = "\
Play blackjack against dealers on the local network

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --udp-port   PORT        UDP port to listen for offers on  [default: 13122]
  --name       NAME        Team name sent to the dealer  [default: ThunderCobras]
  --rounds     N           Rounds per session, skips the prompt

FLAGS:
  --auto                   Hit below 17 and stand otherwise instead of prompting
  -h, --help               Print help information
";

struct Args {
    udp_port: Option<u16>,
    name: String,
    rounds: Option<u8>,
    auto: bool,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        udp_port: pargs.opt_value_from_str("--udp-port")?,
        name: pargs
            .opt_value_from_str("--name")?
            .unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string()),
        rounds: pargs.opt_value_from_str("--rounds")?,
        auto: pargs.contains("--auto"),
    };

    env_logger::builder().format_target(false).init();

    run(args)
}

fn run(args: Args) -> Result<(), Error> {
    let mut config = TableConfig::default();
    if let Some(port) = args.udp_port {
        config.udp_port = port;
    }

    let listener = OfferListener::bind(&config)
        .with_context(|| format!("couldn't listen on UDP port {}", config.udp_port))?;

    let mut terminal = Terminal::new(io::stdin().lock(), io::stdout());
    if args.auto {
        terminal = terminal.with_auto(DEALER_STANDS_AT);
    }

    println!("Client started, listening for offer requests...");
    loop {
        let report = play_next_offer(&listener, &args.name, &mut terminal, |discovered, terminal| {
            println!(
                "Received offer from {} at {}",
                discovered.offer.server_name,
                discovered.source.ip()
            );
            match args.rounds {
                Some(rounds) => Ok(rounds),
                None => terminal.ask_rounds(),
            }
        })
        .context("couldn't receive offers")?;

        if let Err(error) = &report.outcome {
            println!("Error: {error}");
        }
        println!("{}", report.tally);
        println!("Listening...");
    }
}
