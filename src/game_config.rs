//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Limits that decide when a game ends and how forgiving the runner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct GameRules {
    /// Livelock guard: the game stops after this many turns.
    #[serde(default = "default_max_turns")]
    max_turns: u32,

    /// Proposals a player may make per prompt before a penalty or pass is forced.
    #[serde(default = "default_proposal_attempts")]
    proposal_attempts: u32,

    /// Penalties that end the game.
    #[serde(default = "default_penalty_limit")]
    penalty_limit: u32,

    /// Globally locked rows that end the game.
    #[serde(default = "default_locks_to_end")]
    locks_to_end: usize,
}

fn default_max_turns() -> u32 {
    1000
}

fn default_proposal_attempts() -> u32 {
    3
}

fn default_penalty_limit() -> u32 {
    4
}

fn default_locks_to_end() -> usize {
    2
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            proposal_attempts: default_proposal_attempts(),
            penalty_limit: default_penalty_limit(),
            locks_to_end: default_locks_to_end(),
        }
    }
}

/// Kind of player seated from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    /// Built-in first-legal-move computer.
    #[display("computer")]
    Computer,
    /// Reads turns from stdin.
    #[display("human")]
    Human,
    /// Proposes illegal turns and scribbles on its board copies.
    #[display("bad_actor")]
    BadActor,
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_new::new)]
pub struct PlayerSpec {
    /// Display name.
    name: String,
    /// Which implementation plays this seat.
    #[serde(default = "default_kind")]
    kind: PlayerKind,
}

fn default_kind() -> PlayerKind {
    PlayerKind::Computer
}

/// Full configuration for one game.
///
/// ```toml
/// max_turns = 500
/// seed = 7
///
/// [[players]]
/// name = "alice"
///
/// [[players]]
/// name = "mallory"
/// kind = "bad_actor"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// End-of-game limits.
    #[serde(flatten)]
    rules: GameRules,

    /// Seeds the dice and play order for reproducible games.
    #[serde(default)]
    seed: Option<u64>,

    /// Seats in registration order.
    #[serde(default = "default_players")]
    players: Vec<PlayerSpec>,
}

fn default_players() -> Vec<PlayerSpec> {
    ["alice", "bob", "carol"]
        .into_iter()
        .map(|name| PlayerSpec::new(name.to_string(), PlayerKind::Computer))
        .collect()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            seed: None,
            players: default_players(),
        }
    }
}

impl GameConfig {
    /// Creates a configuration with default rules.
    pub fn new(players: Vec<PlayerSpec>, seed: Option<u64>) -> Self {
        Self {
            rules: GameRules::default(),
            seed,
            players,
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading game config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(players = config.players.len(), seed = ?config.seed, "Config loaded successfully");
        Ok(config)
    }

    /// Rejects configurations no game can be played with.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::new("At least one player is required".to_string()));
        }
        if self.rules.proposal_attempts == 0 {
            return Err(ConfigError::new(
                "proposal_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Replaces the seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the seats.
    pub fn with_players(mut self, players: Vec<PlayerSpec>) -> Self {
        self.players = players;
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
