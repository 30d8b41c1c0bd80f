//! Player and game records
//!
//! A `Player` is only ever mutated through the registry. Fields are private and
//! exposed through accessors so the win/game and peak-rating invariants hold.

use crate::types::{GlickoState, PlayerId, RatingState, Season, ZeroNumber, UNKNOWN_TEAM};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Long-term Glicko-2 rating and deviation captured when a game was recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlickoSnapshot {
    pub rating: f64,
    pub deviation: f64,
}

impl From<&GlickoState> for GlickoSnapshot {
    fn from(state: &GlickoState) -> Self {
        Self {
            rating: state.rating,
            deviation: state.deviation,
        }
    }
}

/// One match seen from one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub opponent: PlayerId,
    pub race: String,
    pub won: bool,
    pub duration_seconds: u32,
    pub season: Season,
    pub mmr: u32,
    pub map: String,
    pub played_at: NaiveDateTime,
    /// This player's long-term Glicko-2 before the match
    pub long_term: GlickoSnapshot,
    /// The opponent's long-term Glicko-2 before the match
    pub opponent_long_term: GlickoSnapshot,
}

/// Rating state and history for one canonical player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    ratings: RatingState,
    peak_elo: f64,
    long_term_glicko: GlickoState,
    wins: u32,
    games: Vec<Game>,
    teams: BTreeMap<Season, String>,
    zero_number: ZeroNumber,
}

impl Player {
    pub(crate) fn new(id: PlayerId, initial: RatingState, season: Season, team: String) -> Self {
        let mut teams = BTreeMap::new();
        teams.insert(season, team);
        Self {
            id,
            ratings: initial,
            peak_elo: initial.elo.rating,
            long_term_glicko: GlickoState::default(),
            wins: 0,
            games: Vec::new(),
            teams,
            zero_number: ZeroNumber::Unreachable,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ratings(&self) -> &RatingState {
        &self.ratings
    }

    pub fn elo(&self) -> f64 {
        self.ratings.elo.rating
    }

    pub fn peak_elo(&self) -> f64 {
        self.peak_elo
    }

    pub fn long_term_glicko(&self) -> &GlickoState {
        &self.long_term_glicko
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.games.len() as u32 - self.wins
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn teams(&self) -> &BTreeMap<Season, String> {
        &self.teams
    }

    pub fn team_for(&self, season: Season) -> Option<&str> {
        self.teams.get(&season).map(String::as_str)
    }

    pub fn zero_number(&self) -> ZeroNumber {
        self.zero_number
    }

    /// Team in the most recent season this player has a mapping for
    pub fn most_recent_team(&self) -> &str {
        self.teams
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_TEAM)
    }

    /// Opponents beaten, in game order, one entry per game
    pub fn opponents_beaten(&self) -> impl Iterator<Item = &str> {
        self.games
            .iter()
            .filter(|game| game.won)
            .map(|game| game.opponent.as_str())
    }

    /// Opponents lost to, in game order, one entry per game
    pub fn opponents_lost_to(&self) -> impl Iterator<Item = &str> {
        self.games
            .iter()
            .filter(|game| !game.won)
            .map(|game| game.opponent.as_str())
    }

    /// Most frequently picked race; ties go to the race picked first
    pub fn main_race(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for game in self.games.iter().filter(|game| !game.race.is_empty()) {
            match counts.iter_mut().find(|(race, _)| *race == game.race) {
                Some((_, count)) => *count += 1,
                None => counts.push((game.race.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (race, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((race, count));
            }
        }
        best.map(|(race, _)| race)
    }

    /// Highest match-making rating reported in any game, 0 if none
    pub fn peak_mmr(&self) -> u32 {
        self.games.iter().map(|game| game.mmr).max().unwrap_or(0)
    }

    pub(crate) fn set_team(&mut self, season: Season, team: String) -> Option<String> {
        self.teams.insert(season, team)
    }

    pub(crate) fn push_game(&mut self, game: Game) {
        if game.won {
            self.wins += 1;
        }
        self.games.push(game);
    }

    pub(crate) fn commit_ratings(&mut self, ratings: RatingState) {
        self.ratings = ratings;
        if ratings.elo.rating > self.peak_elo {
            self.peak_elo = ratings.elo.rating;
        }
    }

    pub(crate) fn set_long_term_glicko(&mut self, state: GlickoState) {
        self.long_term_glicko = state;
    }

    pub(crate) fn set_zero_number(&mut self, zero_number: ZeroNumber) {
        self.zero_number = zero_number;
    }
}
