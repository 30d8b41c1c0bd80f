//! Input and output guards for the rating models
//!
//! The underlying formulas happily turn a NaN or a negative deviation into
//! more NaN, and a zero deviation into a degenerate update. Every model call
//! goes through these checks instead.

use crate::error::{LadderError, Result};
use crate::types::{EloState, GlickoState, TrueSkillState};

pub(crate) fn finite(label: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LadderError::invalid_state(format!(
            "{} must be finite, got {}",
            label, value
        )))
    }
}

pub(crate) fn positive(label: &str, value: f64) -> Result<()> {
    finite(label, value)?;
    if value <= 0.0 {
        return Err(LadderError::invalid_state(format!(
            "{} must be positive, got {}",
            label, value
        )));
    }
    Ok(())
}

pub(crate) fn elo(state: &EloState) -> Result<()> {
    finite("Elo rating", state.rating)
}

pub(crate) fn glicko(state: &GlickoState) -> Result<()> {
    finite("Glicko-2 rating", state.rating)?;
    positive("Glicko-2 deviation", state.deviation)?;
    positive("Glicko-2 volatility", state.volatility)
}

pub(crate) fn trueskill(state: &TrueSkillState) -> Result<()> {
    finite("TrueSkill mean", state.mean)?;
    positive("TrueSkill sigma", state.sigma)
}
