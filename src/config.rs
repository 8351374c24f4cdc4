//! Game configuration loaded from TOML, with CLI overrides on top.

use crate::cli::Cli;
use derive_getters::Getters;
use derive_more::{Display, Error};
use glitch_engine::{GameRng, Timings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Settings for one run.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random decision. Random when absent.
    seed: Option<u64>,

    /// Redraw and clock granularity of the terminal loop.
    tick_ms: u64,

    /// Directory that contains the `audio/` assets.
    asset_dir: PathBuf,

    /// Where logs go. The terminal belongs to the game.
    log_file: PathBuf,

    /// Filter used when `RUST_LOG` is unset.
    log_filter: String,

    /// Disturbance level the session starts at.
    starting_disturbance: u32,

    /// Engine delays and intervals.
    timing: Timings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: 50,
            asset_dir: PathBuf::from("assets"),
            log_file: PathBuf::from("glitch_tictactoe.log"),
            log_filter: "info,glitch_engine=debug".to_string(),
            starting_disturbance: 0,
            timing: Timings::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(tick_ms = config.tick_ms, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Random source for a session: seeded when a seed is configured.
    pub fn rng(&self) -> GameRng {
        match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip_all)]
    pub fn with_overrides(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(dir) = &cli.asset_dir {
            self.asset_dir.clone_from(dir);
        }
        if let Some(file) = &cli.log_file {
            self.log_file.clone_from(file);
        }
        if let Some(tick) = cli.tick_ms {
            self.tick_ms = tick;
        }
        if let Some(level) = cli.starting_disturbance {
            self.starting_disturbance = level;
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::new("tick_ms must be at least 1".to_string()));
        }
        Ok(self)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
