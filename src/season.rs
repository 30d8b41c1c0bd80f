//! Season aggregation pass
//!
//! Recomputes every player's long-term Glicko-2 rating by treating each season
//! as one rating period, oldest season first. Each season's period is fed the
//! opponents' long-term snapshots captured when the games were recorded.
//! Seasons without games apply the did-not-compete decay.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::rating::{glicko2_update, GlickoResult};
use crate::registry::{Player, PlayerRegistry};
use crate::types::{GlickoState, PlayerId, Season};
use std::collections::HashMap;
use tracing::{debug, info};

/// Number of seasons the pass must cover: the configured seasons, widened to
/// any older season that actually appears in a game.
pub fn season_span(registry: &PlayerRegistry, configured: usize) -> usize {
    let observed = registry.oldest_season().map_or(0, |oldest| oldest + 1);
    configured.max(observed)
}

/// Long-term Glicko-2 for one player over `season_count` seasons
pub fn long_term_for(
    player: &Player,
    season_count: usize,
    config: &RatingConfig,
) -> Result<GlickoState> {
    let mut state = GlickoState::default();

    for season in (0..season_count).rev() {
        let results = season_results(player, season);
        state = glicko2_update(&state, &results, config)?;
        debug!(
            "Season {} long-term for {}: {} games, rating {:.1} +/- {:.1}",
            season,
            player.id(),
            results.len(),
            state.rating,
            state.deviation
        );
    }

    Ok(state)
}

fn season_results(player: &Player, season: Season) -> Vec<GlickoResult> {
    player
        .games()
        .iter()
        .filter(|game| game.season == season)
        .map(|game| GlickoResult {
            opponent_rating: game.opponent_long_term.rating,
            opponent_deviation: game.opponent_long_term.deviation,
            won: game.won,
        })
        .collect()
}

/// Compute long-term ratings for every player without touching the registry
pub fn compute_long_term(
    registry: &PlayerRegistry,
    season_count: usize,
    config: &RatingConfig,
) -> Result<HashMap<PlayerId, GlickoState>> {
    registry
        .players()
        .into_iter()
        .map(|player| {
            long_term_for(player, season_count, config).map(|state| (player.id().to_string(), state))
        })
        .collect()
}

/// Write computed long-term ratings back through the registry setter
pub fn apply_long_term(
    registry: &mut PlayerRegistry,
    ratings: HashMap<PlayerId, GlickoState>,
) -> Result<()> {
    for (id, state) in ratings {
        registry.set_long_term_glicko(&id, state)?;
    }
    Ok(())
}

/// Run the whole pass: compute, then apply
pub fn aggregate_seasons(
    registry: &mut PlayerRegistry,
    season_count: usize,
    config: &RatingConfig,
) -> Result<()> {
    let ratings = compute_long_term(registry, season_count, config)?;
    apply_long_term(registry, ratings)?;
    info!(
        "Season aggregation updated {} players over {} seasons",
        registry.len(),
        season_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{did_not_compete, StandardMatchRater};
    use crate::types::{MatchMeta, SideDetail};
    use chrono::NaiveDate;

    fn meta(season: Season, day: u32) -> MatchMeta {
        MatchMeta {
            played_at: NaiveDate::from_ymd_opt(2020, 10, day)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            season,
            side_a: SideDetail::default(),
            side_b: SideDetail::default(),
            map: String::new(),
            duration_seconds: 0,
        }
    }

    fn registry() -> PlayerRegistry {
        let mut registry = PlayerRegistry::default();
        registry.get_or_create("alice", 1, None);
        registry.get_or_create("bob", 1, None);
        registry.get_or_create("carol", 1, None);
        registry
    }

    #[test]
    fn test_season_span() {
        let mut registry = registry();
        assert_eq!(season_span(&registry, 2), 2);

        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", true, &meta(4, 1))
            .unwrap();
        assert_eq!(season_span(&registry, 2), 5);
    }

    #[test]
    fn test_games_in_one_season_are_batched() {
        let mut registry = registry();
        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", true, &meta(1, 1))
            .unwrap();
        registry
            .record_match(&rater, "alice", "carol", false, &meta(1, 2))
            .unwrap();

        let config = RatingConfig::default();
        let alice = registry.get("alice").unwrap();
        let long_term = long_term_for(alice, 2, &config).unwrap();

        // Season 1 is one two-game period, season 0 is a decay
        let start = GlickoState::default();
        let period = glicko2_update(
            &start,
            &[
                GlickoResult::new(&start, true),
                GlickoResult::new(&start, false),
            ],
            &config,
        )
        .unwrap();
        let expected = did_not_compete(&period, &config).unwrap();
        assert_eq!(long_term, expected);
    }

    #[test]
    fn test_idle_season_keeps_rating_and_grows_deviation() {
        let mut registry = registry();
        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", true, &meta(1, 1))
            .unwrap();

        let config = RatingConfig::default();
        let start = GlickoState::default();
        let active = glicko2_update(&start, &[GlickoResult::new(&start, true)], &config).unwrap();

        // alice sits out season 0, which comes after season 1
        let alice = registry.get("alice").unwrap();
        let long_term = long_term_for(alice, 2, &config).unwrap();
        assert_eq!(long_term.rating, active.rating);
        assert!(long_term.deviation > active.deviation);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let mut registry = registry();
        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", false, &meta(0, 1))
            .unwrap();

        let config = RatingConfig::default();
        aggregate_seasons(&mut registry, 2, &config).unwrap();
        let first = registry.clone();
        aggregate_seasons(&mut registry, 2, &config).unwrap();
        assert_eq!(registry, first);
    }

    #[test]
    fn test_aggregate_writes_only_long_term() {
        let mut registry = registry();
        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", true, &meta(0, 1))
            .unwrap();
        let before = registry.get("alice").unwrap().clone();

        aggregate_seasons(&mut registry, 1, &RatingConfig::default()).unwrap();

        let after = registry.get("alice").unwrap();
        assert_eq!(after.ratings(), before.ratings());
        assert_eq!(after.games(), before.games());
        assert!(after.long_term_glicko().rating > 1500.0);
        // carol never played: rating untouched, deviation already at the cap
        let carol = registry.get("carol").unwrap();
        assert_eq!(carol.long_term_glicko().rating, 1500.0);
        assert_eq!(carol.long_term_glicko().deviation, 350.0);
    }
}
