//! Main application configuration
//!
//! Settings come from defaults, then an optional TOML file, then environment
//! variables, and are validated before use.

use crate::config::rating::RatingConfig;
use crate::matchmaking::balance::{DEFAULT_EXHAUSTIVE_LIMIT, MAX_EXHAUSTIVE_LIMIT};
use crate::matchmaking::compatibility::DEFAULT_MAX_RATING_DIFFERENCE;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub matchmaking: MatchmakingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Matchmaking-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingSettings {
    /// Maximum rating difference for two players to share a match
    pub max_rating_difference: i64,
    /// Largest pool the team balancer searches exhaustively
    pub exhaustive_balance_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "arena-elo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            max_rating_difference: DEFAULT_MAX_RATING_DIFFERENCE,
            exhaustive_balance_limit: DEFAULT_EXHAUSTIVE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still win
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(rating) = env::var("DEFAULT_RATING") {
            self.rating.default_rating = rating
                .parse()
                .map_err(|_| anyhow!("Invalid DEFAULT_RATING value: {}", rating))?;
        }
        if let Ok(k) = env::var("BASE_K_FACTOR") {
            self.rating.base_k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid BASE_K_FACTOR value: {}", k))?;
        }
        if let Ok(algorithm) = env::var("SETTLEMENT_ALGORITHM") {
            self.rating.settlement_algorithm = algorithm.parse()?;
        }

        // Matchmaking settings
        if let Ok(rating_diff) = env::var("MAX_RATING_DIFFERENCE") {
            self.matchmaking.max_rating_difference = rating_diff
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_RATING_DIFFERENCE value: {}", rating_diff))?;
        }
        if let Ok(limit) = env::var("EXHAUSTIVE_BALANCE_LIMIT") {
            self.matchmaking.exhaustive_balance_limit = limit
                .parse()
                .map_err(|_| anyhow!("Invalid EXHAUSTIVE_BALANCE_LIMIT value: {}", limit))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    // Validate matchmaking settings
    if config.matchmaking.max_rating_difference < 0 {
        return Err(anyhow!("Max rating difference cannot be negative"));
    }
    if config.matchmaking.exhaustive_balance_limit > MAX_EXHAUSTIVE_LIMIT {
        return Err(anyhow!(
            "Exhaustive balance limit cannot exceed {}",
            MAX_EXHAUSTIVE_LIMIT
        ));
    }

    config.rating.validate()?;

    Ok(())
}
