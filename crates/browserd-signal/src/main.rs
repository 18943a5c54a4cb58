//! browserd-signal: command-line rendezvous client.
//!
//! Signs in to a browserd rendezvous server for diagnostics: list the peers
//! the server knows, watch roster updates and relayed messages as they
//! arrive, or relay a single message to a peer.
//!
//! # Usage
//!
//! ```text
//! browserd-signal [OPTIONS] <COMMAND>
//!
//! Commands:
//!   peers   Sign in, print the roster, sign out
//!   watch   Sign in and print events until Ctrl+C
//!   send    Sign in, relay one message to a peer, sign out
//!
//! Options:
//!   --url <URL>                  Rendezvous server [env: BROWSERD_SIGNAL_URL]
//!   --poll-interval-ms <MS>      Poll interval [env: BROWSERD_POLL_INTERVAL_MS]
//!   --peer-name <NAME>           Name to sign in as [env: BROWSERD_PEER_NAME]
//! ```
//!
//! Log output is controlled with `RUST_LOG` (default `info`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use browserd_core::serialize_roster;
use browserd_signal::domain::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_SIGNAL_URL};
use browserd_signal::{RendezvousClient, SignalConfig, SignalEvent, SignalingClient};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "browserd-signal",
    about = "Command-line client for the browserd rendezvous server",
    version
)]
struct Cli {
    /// Base URL of the rendezvous server.
    #[arg(long, default_value = DEFAULT_SIGNAL_URL, env = "BROWSERD_SIGNAL_URL")]
    url: String,

    /// Milliseconds between long-poll ticks.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS, env = "BROWSERD_POLL_INTERVAL_MS")]
    poll_interval_ms: u64,

    /// Peer name to sign in as. A random UUID when omitted.
    #[arg(long, env = "BROWSERD_PEER_NAME")]
    peer_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in, print the current roster as `name,id,connected` lines, sign out.
    Peers,
    /// Sign in and print roster updates and relayed messages until Ctrl+C.
    Watch,
    /// Sign in, relay one message to a peer, sign out.
    Send {
        /// Recipient peer id.
        #[arg(long)]
        to: String,
        /// Message body, sent verbatim.
        data: String,
    },
}

impl Cli {
    fn signal_config(&self) -> SignalConfig {
        SignalConfig::new(self.url.clone(), self.poll_interval_ms)
    }

    fn peer_name(&self) -> String {
        self.peer_name
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.signal_config();
    let peer_name = cli.peer_name();

    let (client, mut events) = SignalingClient::http(&config)
        .with_context(|| format!("invalid rendezvous url '{}'", config.url))?;

    let roster = client
        .sign_in(&peer_name)
        .await
        .with_context(|| format!("sign in to {} as '{peer_name}' failed", config.url))?;
    info!(
        peer_id = %client.id().unwrap_or_default(),
        %peer_name,
        "signed in"
    );

    match cli.command {
        Command::Peers => {
            println!("{}", serialize_roster(&roster));
        }
        Command::Send { to, data } => {
            client
                .send(&data, &to)
                .await
                .with_context(|| format!("relay to peer {to} failed"))?;
            info!(%to, "message relayed");
        }
        Command::Watch => loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(SignalEvent::PeerUpdate(peers)) => {
                        println!("-- roster --\n{}", serialize_roster(&peers));
                    }
                    Some(SignalEvent::PeerMessage { payload, sender_id }) => {
                        println!("{sender_id}: {payload}");
                    }
                    Some(SignalEvent::Error(err)) => warn!(error = %err, "poll failed"),
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("received Ctrl+C, signing out");
                    break;
                }
            }
        },
    }

    client.sign_out().await.context("sign out failed")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
