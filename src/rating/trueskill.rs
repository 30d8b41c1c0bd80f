//! TrueSkill rating model for two-player, no-draw matches

use super::validate;
use crate::config::RatingConfig;
use crate::error::Result;
use crate::types::TrueSkillState;
use skillratings::trueskill::trueskill;
use skillratings::Outcomes;

/// Update both players after one decided match.
///
/// The winner always goes through the "won" branch and the loser through the
/// "lost" branch, so swapping the argument order together with `a_won` gives
/// bit-identical states.
pub fn trueskill_update(
    player_a: &TrueSkillState,
    player_b: &TrueSkillState,
    a_won: bool,
    config: &RatingConfig,
) -> Result<(TrueSkillState, TrueSkillState)> {
    validate::trueskill(player_a)?;
    validate::trueskill(player_b)?;

    let (winner, loser) = if a_won {
        (player_a, player_b)
    } else {
        (player_b, player_a)
    };

    let (new_winner, new_loser) = trueskill(
        &(*winner).into(),
        &(*loser).into(),
        &Outcomes::WIN,
        &config.trueskill_config(),
    );
    let (new_winner, new_loser): (TrueSkillState, TrueSkillState) =
        (new_winner.into(), new_loser.into());
    validate::trueskill(&new_winner)?;
    validate::trueskill(&new_loser)?;

    if a_won {
        Ok((new_winner, new_loser))
    } else {
        Ok((new_loser, new_winner))
    }
}
