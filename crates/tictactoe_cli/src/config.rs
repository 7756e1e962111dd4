//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tictactoe_engine::{Difficulty, Player};
use tracing::{debug, info, instrument, warn};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "TICTACTOE_CONFIG";

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Difficulty of the computer opponent.
    #[serde(default)]
    difficulty: Difficulty,

    /// Pause before the computer answers, in milliseconds.
    #[serde(default = "default_delay_ms")]
    computer_delay_ms: u64,

    /// Seed for the random source; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Marker for the human, skipping the choice prompt.
    #[serde(default)]
    human: Option<Player>,
}

fn default_delay_ms() -> u64 {
    500
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            computer_delay_ms: default_delay_ms(),
            seed: None,
            human: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Difficulty from `--difficulty`.
    pub difficulty: Option<Difficulty>,
    /// Delay from `--delay-ms`.
    pub computer_delay_ms: Option<u64>,
    /// Seed from `--seed`.
    pub seed: Option<u64>,
    /// Marker from `--human`.
    pub human: Option<Player>,
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

        info!(difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Picks the config source: an explicit path, then [`CONFIG_ENV`],
    /// then built-in defaults.
    #[instrument]
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            Ok(_) => {
                warn!(var = CONFIG_ENV, "Config variable is empty, using defaults");
                Ok(Self::default())
            }
            Err(_) => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line overrides on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(difficulty) = overrides.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(delay) = overrides.computer_delay_ms {
            self.computer_delay_ms = delay;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.human.is_some() {
            self.human = overrides.human;
        }
        self
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
