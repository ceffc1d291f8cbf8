//! Command line and environment configuration

use clap::Parser;
use std::path::PathBuf;

/// Four-in-a-row on an 8×8 terminal screen
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "fourinarow")]
#[command(about = "Four-in-a-row for two players, on one terminal or over a broker", long_about = None)]
#[command(version)]
#[command(after_help = "Without --broker two players share this terminal.\n\
With --broker the lobby on that broker is joined.\n\
RUST_LOG sets the log filter (default info).")]
pub struct Config {
    /// File holding the player name, used in networked mode
    #[arg(long, env = "FOURINAROW_NAME_FILE", default_value = "name.txt")]
    pub name_file: PathBuf,

    /// Broker address (HOST:PORT); without it the game is played hot-seat
    #[arg(long, env = "FOURINAROW_BROKER")]
    pub broker: Option<String>,

    /// Where logs go, since the terminal is taken by the game
    #[arg(long = "log", default_value = "fourinarow.log")]
    pub log_file: PathBuf,
}
