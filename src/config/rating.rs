//! Rating model configuration

use crate::error::{LadderError, Result};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloConfig;
use skillratings::glicko2::Glicko2Config;
use skillratings::trueskill::TrueSkillConfig;

/// Parameters shared by the Elo, Glicko-2 and TrueSkill models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Elo K-factor
    pub elo_k: f64,
    /// Elo rating for new players
    pub initial_elo: f64,
    /// Glicko-2 system constant, constrains volatility change
    pub glicko_tau: f64,
    /// Convergence tolerance of the Glicko-2 volatility iteration
    pub glicko_tolerance: f64,
    /// Ceiling for rating deviation after inactivity decay
    pub glicko_max_deviation: f64,
    /// TrueSkill performance spread
    pub trueskill_beta: f64,
    /// TrueSkill additive dynamics factor
    pub trueskill_dynamics: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            elo_k: 80.0,
            initial_elo: 1000.0,
            glicko_tau: 0.5,
            glicko_tolerance: 0.000_001,
            glicko_max_deviation: 350.0,
            trueskill_beta: 25.0 / 6.0,
            trueskill_dynamics: 25.0 / 300.0,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.elo_k.is_finite() || self.elo_k <= 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "Elo K-factor must be positive".to_string(),
            });
        }

        if !self.initial_elo.is_finite() {
            return Err(LadderError::ConfigurationError {
                message: "Initial Elo rating must be finite".to_string(),
            });
        }

        if !self.glicko_tau.is_finite() || self.glicko_tau <= 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "Glicko-2 tau must be positive".to_string(),
            });
        }

        if !self.glicko_tolerance.is_finite() || self.glicko_tolerance <= 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "Glicko-2 convergence tolerance must be positive".to_string(),
            });
        }

        if !self.glicko_max_deviation.is_finite() || self.glicko_max_deviation <= 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "Glicko-2 maximum deviation must be positive".to_string(),
            });
        }

        if !self.trueskill_beta.is_finite() || self.trueskill_beta <= 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "TrueSkill beta must be positive".to_string(),
            });
        }

        if !self.trueskill_dynamics.is_finite() || self.trueskill_dynamics < 0.0 {
            return Err(LadderError::ConfigurationError {
                message: "TrueSkill dynamics must be non-negative".to_string(),
            });
        }

        Ok(())
    }

    pub fn elo_config(&self) -> EloConfig {
        EloConfig { k: self.elo_k }
    }

    pub fn glicko_config(&self) -> Glicko2Config {
        Glicko2Config {
            tau: self.glicko_tau,
            convergence_tolerance: self.glicko_tolerance,
        }
    }

    /// TrueSkill configuration with draws disabled
    pub fn trueskill_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: 0.0,
            beta: self.trueskill_beta,
            default_dynamics: self.trueskill_dynamics,
        }
    }
}
