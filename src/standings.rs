//! Standings report
//!
//! One plain summary row per player. Rendering the rows to CSV, a spreadsheet
//! or anything else is left to the caller.

use crate::registry::{Player, PlayerRegistry};
use crate::types::{PlayerId, ZeroNumber};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary of one player's standing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,
    /// Team in the most recent season the player appeared in
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub elo: f64,
    pub peak_elo: f64,
    pub glicko_rating: f64,
    pub glicko_deviation: f64,
    pub long_term_rating: f64,
    pub long_term_deviation: f64,
    pub trueskill_mean: f64,
    pub trueskill_sigma: f64,
    pub peak_mmr: u32,
    pub zero_number: ZeroNumber,
    pub main_race: Option<String>,
    /// Beaten opponents, strongest (by current Elo) first
    pub opponents_beaten: Vec<PlayerId>,
    /// Opponents lost to, weakest (by current Elo) first
    pub opponents_lost_to: Vec<PlayerId>,
}

fn by_elo(registry: &PlayerRegistry, a: &str, b: &str) -> Ordering {
    let elo = |id: &str| registry.get(id).map_or(f64::NEG_INFINITY, Player::elo);
    elo(a).partial_cmp(&elo(b)).unwrap_or(Ordering::Equal)
}

/// Build one player's row
pub fn standing_for(registry: &PlayerRegistry, player: &Player) -> Standing {
    let mut beaten: Vec<PlayerId> = player.opponents_beaten().map(str::to_string).collect();
    beaten.sort_by(|a, b| by_elo(registry, b, a));

    let mut lost_to: Vec<PlayerId> = player.opponents_lost_to().map(str::to_string).collect();
    lost_to.sort_by(|a, b| by_elo(registry, a, b));

    let ratings = player.ratings();
    Standing {
        player_id: player.id().to_string(),
        team: player.most_recent_team().to_string(),
        wins: player.wins(),
        losses: player.losses(),
        elo: player.elo(),
        peak_elo: player.peak_elo(),
        glicko_rating: ratings.glicko.rating,
        glicko_deviation: ratings.glicko.deviation,
        long_term_rating: player.long_term_glicko().rating,
        long_term_deviation: player.long_term_glicko().deviation,
        trueskill_mean: ratings.trueskill.mean,
        trueskill_sigma: ratings.trueskill.sigma,
        peak_mmr: player.peak_mmr(),
        zero_number: player.zero_number(),
        main_race: player.main_race().map(str::to_string),
        opponents_beaten: beaten,
        opponents_lost_to: lost_to,
    }
}

/// Rows for every player, highest Elo first, ties by identifier
pub fn build_standings(registry: &PlayerRegistry) -> Vec<Standing> {
    let mut standings: Vec<Standing> = registry
        .players()
        .into_iter()
        .map(|player| standing_for(registry, player))
        .collect();

    standings.sort_by(|a, b| {
        b.elo
            .partial_cmp(&a.elo)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    standings
}
