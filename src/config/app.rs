//! Main application configuration
//!
//! This module defines the top-level configuration for a ladder run, loaded
//! from a TOML file or from environment variables, and its validation.

use super::ladder::LadderConfig;
use super::pipeline::{CreationPolicy, ErrorPolicy, PipelineConfig};
use super::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub pipeline: PipelineConfig,
    pub ladder: LadderConfig,
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "ladder-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then overlay environment variables.
    /// Missing sections take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env_overrides()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Overlay any set environment variables onto this configuration
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(k) = env::var("ELO_K_FACTOR") {
            self.rating.elo_k = parse_env("ELO_K_FACTOR", &k)?;
        }
        if let Ok(initial) = env::var("ELO_INITIAL_RATING") {
            self.rating.initial_elo = parse_env("ELO_INITIAL_RATING", &initial)?;
        }
        if let Ok(tau) = env::var("GLICKO_TAU") {
            self.rating.glicko_tau = parse_env("GLICKO_TAU", &tau)?;
        }
        if let Ok(max_deviation) = env::var("GLICKO_MAX_DEVIATION") {
            self.rating.glicko_max_deviation = parse_env("GLICKO_MAX_DEVIATION", &max_deviation)?;
        }
        if let Ok(beta) = env::var("TRUESKILL_BETA") {
            self.rating.trueskill_beta = parse_env("TRUESKILL_BETA", &beta)?;
        }
        if let Ok(dynamics) = env::var("TRUESKILL_DYNAMICS") {
            self.rating.trueskill_dynamics = parse_env("TRUESKILL_DYNAMICS", &dynamics)?;
        }

        // Pipeline settings
        if let Ok(policy) = env::var("ERROR_POLICY") {
            self.pipeline.error_policy = parse_env::<ErrorPolicy>("ERROR_POLICY", &policy)?;
        }
        if let Ok(policy) = env::var("CREATION_POLICY") {
            self.pipeline.creation_policy =
                parse_env::<CreationPolicy>("CREATION_POLICY", &policy)?;
        }

        // Ladder settings
        if let Ok(seasons) = env::var("LADDER_SEASONS") {
            self.ladder.seasons = seasons
                .split(',')
                .map(|season| season.trim().to_string())
                .filter(|season| !season.is_empty())
                .collect();
        }
        if let Ok(root) = env::var("ZERO_NUMBER_ROOT") {
            self.ladder.zero_root = root;
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

    config.rating.validate()?;

    if config.ladder.zero_root.trim().is_empty() {
        return Err(anyhow!("Zero Number root cannot be empty"));
    }

    let mut seen = HashSet::new();
    for season in &config.ladder.seasons {
        if season.trim().is_empty() {
            return Err(anyhow!("Season names cannot be empty"));
        }
        if !seen.insert(season.as_str()) {
            return Err(anyhow!("Duplicate season name: {}", season));
        }
    }

    Ok(())
}
