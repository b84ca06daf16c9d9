//! Command-line interface for strictly_qwixx.

use clap::{Parser, Subcommand};

/// Strictly Qwixx - rules-checked Qwixx games between computer, human, and adversarial players
#[derive(Parser, Debug)]
#[command(name = "strictly_qwixx")]
#[command(about = "Play Qwixx with validated turns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full game
    Play {
        /// Path to a game config file (TOML)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for dice and play order
        #[arg(long)]
        seed: Option<u64>,

        /// Computer player names (replaces the configured players)
        #[arg(short, long, num_args = 1..)]
        players: Vec<String>,

        /// Add a human player reading turns from stdin
        #[arg(long)]
        human: Option<String>,

        /// Add a player that proposes illegal turns
        #[arg(long)]
        bad_actor: Option<String>,

        /// Print the final summary as JSON instead of a play-by-play
        #[arg(long)]
        json: bool,
    },

    /// Print an empty board
    Board,
}
