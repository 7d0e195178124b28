//! Game and bot settings, loaded from TOML at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::engine::error::ConfigError;
use crate::engine::log::DEFAULT_LOG_CAPACITY;
use crate::games::crypto_poly::players::{default_roster, BotSeat};

/// How a bot decides whether and what to buy, and how long it "thinks".
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BotProfile {
    pub description: Option<String>,
    /// "random" (coin flip between sides) or "cheapest" (always the cheaper side).
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,
    /// The bot only considers a purchase while holding more than this.
    #[serde(default = "default_purchase_threshold")]
    pub purchase_threshold: i64,

    #[serde(default = "default_step_ms")]
    pub think_ms: u64,
    #[serde(default = "default_step_ms")]
    pub move_ms: u64,
    #[serde(default = "default_step_ms")]
    pub purchase_ms: u64,
    #[serde(default = "default_end_turn_ms")]
    pub end_turn_ms: u64,
}

fn default_strategy_type() -> String {
    "random".into()
}

fn default_purchase_threshold() -> i64 {
    500
}

fn default_step_ms() -> u64 {
    1000
}

fn default_end_turn_ms() -> u64 {
    1500
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            description: None,
            strategy_type: default_strategy_type(),
            purchase_threshold: default_purchase_threshold(),
            think_ms: default_step_ms(),
            move_ms: default_step_ms(),
            purchase_ms: default_step_ms(),
            end_turn_ms: default_end_turn_ms(),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_starting_money")]
    pub starting_money: i64,
    #[serde(default = "default_pass_go_bonus")]
    pub pass_go_bonus: i64,
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    #[serde(default = "default_roster")]
    pub bots: Vec<BotSeat>,
    #[serde(default)]
    pub bot: BotProfile,
}

fn default_starting_money() -> i64 {
    1500
}

fn default_pass_go_bonus() -> i64 {
    200
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            pass_go_bonus: default_pass_go_bonus(),
            log_capacity: default_log_capacity(),
            bots: default_roster(),
            bot: BotProfile::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bots.is_empty() {
            return Err(ConfigError::Invalid("bot roster is empty".into()));
        }
        // Arena results are reported per name
        let mut seen = HashSet::new();
        if let Some(dup) = self.bots.iter().find(|b| !seen.insert(b.name.as_str())) {
            return Err(ConfigError::Invalid(format!("duplicate bot name: {}", dup.name)));
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::Invalid("log_capacity must be positive".into()));
        }
        if !matches!(self.bot.strategy_type.as_str(), "random" | "cheapest") {
            return Err(ConfigError::Invalid(format!(
                "unknown strategy_type: {}",
                self.bot.strategy_type
            )));
        }
        Ok(())
    }
}

/// Load and validate a config from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GameConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Try to load a config from well-known paths, returning the defaults if none found.
pub fn load_default_config() -> GameConfig {
    let candidates = [
        "crypto_poly.toml",
        "../crypto_poly.toml",
        "/etc/crypto-poly/crypto_poly.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), bots = config.bots.len(), "loaded game config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load game config");
                }
            }
        }
    }
    tracing::info!("no crypto_poly.toml found, using built-in defaults");
    GameConfig::default()
}
