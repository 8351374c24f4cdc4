//! glitch_tictactoe - tic-tac-toe that fights back
//!
//! The game logic lives in [`glitch_engine`]; this crate is the terminal
//! front end around it.
//!
//! # Architecture
//!
//! - **Config**: TOML file plus command-line overrides
//! - **TUI**: ratatui presenter and the real-time loop
//! - **Audio**: ambient track playback
//! - **Simulate**: headless random sessions
//!
//! # Example
//!
//! ```no_run
//! use glitch_tictactoe::{GameConfig, simulate};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = GameConfig::load("glitch_tictactoe.toml")?;
//! let report = simulate(&config, 100);
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod audio;
mod cli;
mod config;
mod simulate;
pub mod tui;

pub use audio::AmbientPlayer;
pub use cli::{Cli, Command};
pub use config::{ConfigError, GameConfig};
pub use simulate::{SimulationReport, simulate};
