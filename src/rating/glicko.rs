//! Glicko-2 rating model
//!
//! Rating-period updates and inactivity decay on top of `skillratings::glicko2`.

use super::validate;
use crate::config::RatingConfig;
use crate::error::Result;
use crate::types::GlickoState;
use skillratings::glicko2::{decay_deviation, glicko2_rating_period, Glicko2Rating};
use skillratings::Outcomes;

/// One game inside a rating period, seen from the rated player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlickoResult {
    pub opponent_rating: f64,
    pub opponent_deviation: f64,
    pub won: bool,
}

impl GlickoResult {
    pub fn new(opponent: &GlickoState, won: bool) -> Self {
        Self {
            opponent_rating: opponent.rating,
            opponent_deviation: opponent.deviation,
            won,
        }
    }
}

/// Apply one rating period.
///
/// An empty `results` slice is the did-not-compete transition.
pub fn glicko2_update(
    player: &GlickoState,
    results: &[GlickoResult],
    config: &RatingConfig,
) -> Result<GlickoState> {
    if results.is_empty() {
        return did_not_compete(player, config);
    }

    validate::glicko(player)?;
    let mut period = Vec::with_capacity(results.len());
    for result in results {
        validate::finite("Opponent Glicko-2 rating", result.opponent_rating)?;
        validate::positive("Opponent Glicko-2 deviation", result.opponent_deviation)?;

        // Volatility of the opponent does not enter the update
        let opponent = Glicko2Rating {
            rating: result.opponent_rating,
            deviation: result.opponent_deviation,
            volatility: GlickoState::default().volatility,
        };
        let outcome = if result.won {
            Outcomes::WIN
        } else {
            Outcomes::LOSS
        };
        period.push((opponent, outcome));
    }

    let updated: GlickoState =
        glicko2_rating_period(&(*player).into(), &period, &config.glicko_config()).into();
    validate::glicko(&updated)?;
    Ok(updated)
}

/// Inactivity decay: deviation grows, rating and volatility stay put.
pub fn did_not_compete(player: &GlickoState, config: &RatingConfig) -> Result<GlickoState> {
    validate::glicko(player)?;

    let decayed: GlickoState = decay_deviation(&(*player).into()).into();
    let decayed = GlickoState {
        rating: player.rating,
        deviation: decayed
            .deviation
            .min(config.glicko_max_deviation)
            .max(player.deviation),
        volatility: player.volatility,
    };
    validate::glicko(&decayed)?;
    Ok(decayed)
}
