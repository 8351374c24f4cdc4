//! Command-line interface for glitch_tictactoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe against a bot that does not like losing
#[derive(Parser, Debug, Default)]
#[command(name = "glitch_tictactoe")]
#[command(about = "Tic-tac-toe that gets stranger every time you win", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "glitch_tictactoe.toml")]
    pub config: PathBuf,

    /// Seed for the random source
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Directory containing the audio/ assets
    #[arg(long, global = true)]
    pub asset_dir: Option<PathBuf>,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Milliseconds between frames
    #[arg(long, global = true)]
    pub tick_ms: Option<u64>,

    /// Start the session at this disturbance level
    #[arg(long, global = true)]
    pub starting_disturbance: Option<u32>,

    /// Subcommand to run (defaults to play)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal
    Play,

    /// Pit a random clicker against the bot without a terminal
    Simulate {
        /// Number of rounds to play
        #[arg(short, long, default_value = "100")]
        games: u32,
    },
}
