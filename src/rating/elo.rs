//! Elo rating model
//!
//! Thin wrapper over `skillratings::elo` that adds input validation.

use super::validate;
use crate::config::RatingConfig;
use crate::error::Result;
use crate::types::EloState;
use skillratings::elo::elo;
use skillratings::Outcomes;

/// Probability that `player` beats `opponent` under the logistic Elo curve
pub fn expected_score(player: &EloState, opponent: &EloState) -> f64 {
    let (player_expected, _) =
        skillratings::elo::expected_score(&(*player).into(), &(*opponent).into());
    player_expected
}

/// Update both ratings after one decided match.
///
/// `a_won` is the result from `player_a`'s point of view. The change is
/// zero-sum: whatever A gains, B loses.
pub fn elo_update(
    player_a: &EloState,
    player_b: &EloState,
    a_won: bool,
    config: &RatingConfig,
) -> Result<(EloState, EloState)> {
    validate::elo(player_a)?;
    validate::elo(player_b)?;
    validate::positive("Elo K-factor", config.elo_k)?;

    let outcome = if a_won { Outcomes::WIN } else { Outcomes::LOSS };
    let (new_a, new_b) = elo(
        &(*player_a).into(),
        &(*player_b).into(),
        &outcome,
        &config.elo_config(),
    );

    let (new_a, new_b): (EloState, EloState) = (new_a.into(), new_b.into());
    validate::elo(&new_a)?;
    validate::elo(&new_b)?;
    Ok((new_a, new_b))
}
