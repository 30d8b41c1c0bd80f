//! Player registry
//!
//! Owns every `Player` and is the only place that appends games or changes
//! ratings. Downstream passes write their own derived fields through explicit
//! setters.

use super::player::{Game, GlickoSnapshot, Player};
use crate::config::CreationPolicy;
use crate::error::{LadderError, Result};
use crate::rating::MatchRater;
use crate::types::{GlickoState, MatchMeta, PlayerId, RatingState, Season, ZeroNumber, UNKNOWN_TEAM};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Registry of all known players, keyed by canonical identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    initial_state: RatingState,
}

impl PlayerRegistry {
    /// Create an empty registry whose new players start from `initial_state`
    pub fn new(initial_state: RatingState) -> Self {
        Self {
            players: HashMap::new(),
            initial_state,
        }
    }

    /// Return the player, creating it with default ratings if unknown.
    ///
    /// A new player starts with `team` (or the unknown-team marker) as its
    /// mapping for `season`. Existing players are returned untouched.
    pub fn get_or_create(&mut self, id: &str, season: Season, team: Option<&str>) -> &mut Player {
        let initial_state = self.initial_state;
        self.players.entry(id.to_string()).or_insert_with(|| {
            debug!("Registering new player {} in season {}", id, season);
            Player::new(
                id.to_string(),
                initial_state,
                season,
                team.unwrap_or(UNKNOWN_TEAM).to_string(),
            )
        })
    }

    /// Resolve a participant under the given creation policy.
    ///
    /// Returns whether the player was newly created.
    pub fn resolve(
        &mut self,
        id: &str,
        season: Season,
        team: Option<&str>,
        policy: CreationPolicy,
    ) -> Result<bool> {
        if self.players.contains_key(id) {
            return Ok(false);
        }

        match policy {
            CreationPolicy::Lazy => {
                self.get_or_create(id, season, team);
                Ok(true)
            }
            CreationPolicy::RegisteredOnly => Err(LadderError::unknown_player(id)),
        }
    }

    /// Register a player up front, for use with `CreationPolicy::RegisteredOnly`
    pub fn register(&mut self, id: &str, season: Season, team: Option<&str>) -> &mut Player {
        self.get_or_create(id, season, team)
    }

    /// Drop a player created for a match that then failed
    pub(crate) fn discard(&mut self, id: &str) {
        self.players.remove(id);
    }

    /// Record a decided match between two registered players.
    ///
    /// Rates the match first; only when every model succeeds are the mirrored
    /// games appended, the winner's count bumped and the new ratings (and
    /// peaks) committed.
    pub fn record_match<R: MatchRater + ?Sized>(
        &mut self,
        rater: &R,
        player_a: &str,
        player_b: &str,
        a_won: bool,
        meta: &MatchMeta,
    ) -> Result<()> {
        if player_a == player_b {
            return Err(LadderError::malformed(format!(
                "player {} cannot play against themselves",
                player_a
            )));
        }

        let a = self
            .players
            .get(player_a)
            .ok_or_else(|| LadderError::unknown_player(player_a))?;
        let b = self
            .players
            .get(player_b)
            .ok_or_else(|| LadderError::unknown_player(player_b))?;

        let long_term_a = GlickoSnapshot::from(a.long_term_glicko());
        let long_term_b = GlickoSnapshot::from(b.long_term_glicko());
        let (new_a, new_b) = rater.rate_match(a.ratings(), b.ratings(), a_won)?;

        let game_a = Game {
            opponent: player_b.to_string(),
            race: meta.side_a.race.clone(),
            won: a_won,
            duration_seconds: meta.duration_seconds,
            season: meta.season,
            mmr: meta.side_a.mmr,
            map: meta.map.clone(),
            played_at: meta.played_at,
            long_term: long_term_a,
            opponent_long_term: long_term_b,
        };
        let game_b = Game {
            opponent: player_a.to_string(),
            race: meta.side_b.race.clone(),
            won: !a_won,
            duration_seconds: meta.duration_seconds,
            season: meta.season,
            mmr: meta.side_b.mmr,
            map: meta.map.clone(),
            played_at: meta.played_at,
            long_term: long_term_b,
            opponent_long_term: long_term_a,
        };

        if let Some(a) = self.players.get_mut(player_a) {
            a.push_game(game_a);
            a.commit_ratings(new_a);
        }
        if let Some(b) = self.players.get_mut(player_b) {
            b.push_game(game_b);
            b.commit_ratings(new_b);
        }

        debug!(
            "Recorded {} vs {} (winner {}): Elo {:.1} / {:.1}",
            player_a,
            player_b,
            if a_won { player_a } else { player_b },
            new_a.elo.rating,
            new_b.elo.rating
        );
        Ok(())
    }

    /// Set a player's team for a season. The last write for a season wins.
    pub fn set_team(&mut self, id: &str, season: Season, team: &str) -> Result<()> {
        let player = self
            .players
            .get_mut(id)
            .ok_or_else(|| LadderError::unknown_player(id))?;

        if let Some(previous) = player.set_team(season, team.to_string()) {
            if previous != team && previous != UNKNOWN_TEAM {
                warn!(
                    "Player {} moved from {} to {} within season {}",
                    id, previous, team, season
                );
            }
        }
        Ok(())
    }

    /// Written only by the Zero Number engine
    pub fn set_zero_number(&mut self, id: &str, zero_number: ZeroNumber) -> Result<()> {
        self.players
            .get_mut(id)
            .ok_or_else(|| LadderError::unknown_player(id))?
            .set_zero_number(zero_number);
        Ok(())
    }

    /// Written only by the season aggregation pass
    pub fn set_long_term_glicko(&mut self, id: &str, state: GlickoState) -> Result<()> {
        self.players
            .get_mut(id)
            .ok_or_else(|| LadderError::unknown_player(id))?
            .set_long_term_glicko(state);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.contains_key(id)
    }

    /// All players, sorted by identifier
    pub fn players(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().collect();
        players.sort_by(|a, b| a.id().cmp(b.id()));
        players
    }

    /// Oldest season index referenced by any game, if any game exists
    pub fn oldest_season(&self) -> Option<Season> {
        self.players
            .values()
            .flat_map(|player| player.games().iter().map(|game| game.season))
            .max()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{MockMatchRater, StandardMatchRater};
    use crate::types::SideDetail;
    use chrono::NaiveDate;

    fn meta(season: Season) -> MatchMeta {
        MatchMeta {
            played_at: NaiveDate::from_ymd_opt(2021, 2, 13)
                .unwrap()
                .and_hms_opt(20, 0, 0)
                .unwrap(),
            season,
            side_a: SideDetail {
                race: "Zerg".to_string(),
                team: None,
                mmr: 4200,
            },
            side_b: SideDetail::default(),
            map: "Ever Dream".to_string(),
            duration_seconds: 720,
        }
    }

    fn registry_with(ids: &[&str]) -> PlayerRegistry {
        let mut registry = PlayerRegistry::new(RatingState::default());
        for id in ids {
            registry.get_or_create(id, 0, None);
        }
        registry
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = PlayerRegistry::default();
        registry.get_or_create("alice", 2, Some("Red"));
        registry.get_or_create("alice", 0, Some("Blue"));

        assert_eq!(registry.len(), 1);
        let alice = registry.get("alice").unwrap();
        assert_eq!(alice.team_for(2), Some("Red"));
        assert_eq!(alice.team_for(0), None);
    }

    #[test]
    fn test_unknown_team_marker() {
        let mut registry = PlayerRegistry::default();
        registry.get_or_create("alice", 0, None);
        assert_eq!(registry.get("alice").unwrap().team_for(0), Some(UNKNOWN_TEAM));
    }

    #[test]
    fn test_record_match_mirrors_games() {
        let mut registry = registry_with(&["alice", "bob"]);
        let rater = StandardMatchRater::default();

        registry
            .record_match(&rater, "alice", "bob", true, &meta(0))
            .unwrap();

        let alice = registry.get("alice").unwrap();
        let bob = registry.get("bob").unwrap();
        assert_eq!(alice.games().len(), 1);
        assert_eq!(bob.games().len(), 1);
        assert_eq!(alice.games()[0].opponent, "bob");
        assert_eq!(bob.games()[0].opponent, "alice");
        assert!(alice.games()[0].won);
        assert!(!bob.games()[0].won);
        assert_eq!(alice.games()[0].race, "Zerg");
        assert_eq!(alice.games()[0].mmr, 4200);
        assert_eq!(bob.games()[0].race, "");
        assert_eq!(alice.wins(), 1);
        assert_eq!(bob.wins(), 0);
        assert!((alice.elo() - 1040.0).abs() < 1e-9);
        assert!((alice.peak_elo() - 1040.0).abs() < 1e-9);
        assert_eq!(bob.peak_elo(), 1000.0);
        assert_eq!(alice.games()[0].opponent_long_term.deviation, 350.0);
    }

    #[test]
    fn test_record_match_is_atomic() {
        let mut registry = registry_with(&["alice", "bob"]);
        let before = registry.clone();
        let rater = MockMatchRater::new();
        rater.fail_on_call(0);

        let result = registry.record_match(&rater, "alice", "bob", true, &meta(0));
        assert!(matches!(result, Err(LadderError::InvalidState { .. })));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_record_match_unknown_player() {
        let mut registry = registry_with(&["alice"]);
        let rater = StandardMatchRater::default();

        let result = registry.record_match(&rater, "alice", "ghost", true, &meta(0));
        assert_eq!(
            result,
            Err(LadderError::UnknownPlayer {
                player_id: "ghost".to_string()
            })
        );
        assert!(registry.get("alice").unwrap().games().is_empty());
    }

    #[test]
    fn test_resolve_policies() {
        let mut registry = PlayerRegistry::default();
        assert!(registry
            .resolve("alice", 0, None, CreationPolicy::Lazy)
            .unwrap());
        assert!(!registry
            .resolve("alice", 0, None, CreationPolicy::RegisteredOnly)
            .unwrap());
        assert!(registry
            .resolve("bob", 0, None, CreationPolicy::RegisteredOnly)
            .is_err());

        registry.register("bob", 0, Some("Red"));
        assert!(!registry
            .resolve("bob", 0, None, CreationPolicy::RegisteredOnly)
            .unwrap());
    }

    #[test]
    fn test_set_team_overwrites() {
        let mut registry = registry_with(&["alice"]);
        registry.set_team("alice", 0, "Red").unwrap();
        registry.set_team("alice", 0, "Blue").unwrap();
        assert_eq!(registry.get("alice").unwrap().team_for(0), Some("Blue"));
        assert!(registry.set_team("ghost", 0, "Red").is_err());
    }

    #[test]
    fn test_players_sorted_and_oldest_season() {
        let mut registry = registry_with(&["carol", "alice", "bob"]);
        assert_eq!(registry.oldest_season(), None);

        let rater = StandardMatchRater::default();
        registry
            .record_match(&rater, "alice", "bob", false, &meta(3))
            .unwrap();

        let ids: Vec<&str> = registry.players().iter().map(|p| p.id()).collect();
        assert_eq!(ids, ["alice", "bob", "carol"]);
        assert_eq!(registry.oldest_season(), Some(3));
    }
}
