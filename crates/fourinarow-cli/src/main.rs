//! fourinarow
//!
//! Four-in-a-row on an 8×8 terminal screen. Two players share the keyboard,
//! or with `--broker` each player runs their own copy and they meet in the
//! lobby.

mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use fourinarow_bus::TcpBus;
use fourinarow_core::Player;
use fourinarow_game::{Outcome, run_local};
use fourinarow_lobby::{PlayerName, connect_options, play_networked};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use terminal::{TerminalGuard, TerminalKeypad, TerminalScreen};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The terminal belongs to the game, so logs go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn describe(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        Some(Outcome::Won { winner: Player::One, .. }) => "green wins",
        Some(Outcome::Won { winner: Player::Two, .. }) => "red wins",
        Some(Outcome::Draw) => "draw",
        None => "no result",
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config.log_file)?;
    info!(?config, "fourinarow starting");

    let outcome = match &config.broker {
        None => {
            let _guard = TerminalGuard::enter()?;
            run_local(&mut TerminalScreen::new(), &mut TerminalKeypad).await?
        }
        Some(addr) => {
            // Fail on a bad name or an unreachable broker before taking over the terminal
            let name = PlayerName::load(&config.name_file)?;
            let mut bus = TcpBus::connect(addr.as_str(), connect_options(&name))
                .await
                .with_context(|| format!("cannot reach broker at {}", addr))?;
            info!("playing as {}", name);
            let _guard = TerminalGuard::enter()?;
            play_networked(&mut bus, name, &mut TerminalScreen::new(), &mut TerminalKeypad).await?
        }
    };

    info!(?outcome, "fourinarow exiting");
    println!("{}", describe(outcome));
    Ok(())
}
