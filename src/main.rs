//! glitch_tictactoe - terminal entry point

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use glitch_tictactoe::{Cli, Command, GameConfig, simulate, tui};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = GameConfig::load(&cli.config)?.with_overrides(&cli)?;

    init_tracing(&config)?;
    info!(
        config = %cli.config.display(),
        seed = ?config.seed(),
        "Starting glitch_tictactoe"
    );

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => tui::run_tui(&config).await,
        Command::Simulate { games } => {
            let report = simulate(&config, games);
            println!("{report}");
            Ok(())
        }
    }
}

/// Logs go to a file; the terminal belongs to the game.
fn init_tracing(config: &GameConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file())
        .with_context(|| format!("Failed to create log file {}", config.log_file().display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
