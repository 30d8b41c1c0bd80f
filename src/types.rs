//! Common types used throughout the ladder rating core

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use skillratings::elo::EloRating;
use skillratings::glicko2::Glicko2Rating;
use skillratings::trueskill::TrueSkillRating;
use std::fmt;

/// Canonical player identifier, already resolved from any alias
pub type PlayerId = String;

/// Season index. 0 is the most recent season, higher indices are older.
pub type Season = usize;

/// Team label stored when the roster resolver had no answer
pub const UNKNOWN_TEAM: &str = "TEAM_NOT_KNOWN";

/// Elo rating state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EloState {
    pub rating: f64,
}

impl Default for EloState {
    fn default() -> Self {
        Self { rating: 1000.0 }
    }
}

impl From<EloRating> for EloState {
    fn from(rating: EloRating) -> Self {
        Self {
            rating: rating.rating,
        }
    }
}

impl From<EloState> for EloRating {
    fn from(state: EloState) -> Self {
        Self {
            rating: state.rating,
        }
    }
}

/// Glicko-2 rating state on the familiar 1500 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlickoState {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl Default for GlickoState {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl From<Glicko2Rating> for GlickoState {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

impl From<GlickoState> for Glicko2Rating {
    fn from(state: GlickoState) -> Self {
        Self {
            rating: state.rating,
            deviation: state.deviation,
            volatility: state.volatility,
        }
    }
}

/// TrueSkill rating state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrueSkillState {
    pub mean: f64,
    pub sigma: f64,
}

impl Default for TrueSkillState {
    fn default() -> Self {
        Self {
            mean: 25.0,
            sigma: 25.0 / 3.0,
        }
    }
}

impl From<TrueSkillRating> for TrueSkillState {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mean: rating.rating,
            sigma: rating.uncertainty,
        }
    }
}

impl From<TrueSkillState> for TrueSkillRating {
    fn from(state: TrueSkillState) -> Self {
        Self {
            rating: state.mean,
            uncertainty: state.sigma,
        }
    }
}

/// Everything the per-match rater updates for one player
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingState {
    pub elo: EloState,
    /// Short-term Glicko-2, updated after every match
    pub glicko: GlickoState,
    pub trueskill: TrueSkillState,
}

/// Loss-hop distance from the reference player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroNumber {
    Reachable(u32),
    #[default]
    Unreachable,
}

impl ZeroNumber {
    /// Hop count, if the player is connected to the root
    pub fn hops(&self) -> Option<u32> {
        match self {
            ZeroNumber::Reachable(hops) => Some(*hops),
            ZeroNumber::Unreachable => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, ZeroNumber::Reachable(_))
    }
}

impl fmt::Display for ZeroNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroNumber::Reachable(hops) => write!(f, "{}", hops),
            ZeroNumber::Unreachable => write!(f, "-"),
        }
    }
}

/// Per-participant detail supplied by the match source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideDetail {
    /// Race or faction picked for the match, empty when unknown
    #[serde(default)]
    pub race: String,
    /// Team for the match's season, if the roster resolver knew it
    #[serde(default)]
    pub team: Option<String>,
    /// Match-making rating reported by the source, 0 when unknown
    #[serde(default)]
    pub mmr: u32,
}

/// One head-to-head result as handed over by a match source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub player_a: PlayerId,
    pub player_b: PlayerId,
    pub winner: Option<PlayerId>,
    pub season: Season,
    #[serde(default)]
    pub side_a: SideDetail,
    #[serde(default)]
    pub side_b: SideDetail,
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub duration_seconds: u32,
    /// Set by sources that cannot vouch for every record
    #[serde(default)]
    pub best_effort: bool,
}

impl MatchRecord {
    /// Create a record for a decided match without any optional detail
    pub fn new(
        timestamp: NaiveDateTime,
        player_a: impl Into<PlayerId>,
        player_b: impl Into<PlayerId>,
        winner: impl Into<PlayerId>,
        season: Season,
    ) -> Self {
        Self {
            timestamp: Some(timestamp),
            player_a: player_a.into(),
            player_b: player_b.into(),
            winner: Some(winner.into()),
            season,
            side_a: SideDetail::default(),
            side_b: SideDetail::default(),
            map: String::new(),
            duration_seconds: 0,
            best_effort: false,
        }
    }

    pub fn with_races(mut self, race_a: impl Into<String>, race_b: impl Into<String>) -> Self {
        self.side_a.race = race_a.into();
        self.side_b.race = race_b.into();
        self
    }

    pub fn with_teams(mut self, team_a: impl Into<String>, team_b: impl Into<String>) -> Self {
        self.side_a.team = Some(team_a.into());
        self.side_b.team = Some(team_b.into());
        self
    }

    pub fn with_mmrs(mut self, mmr_a: u32, mmr_b: u32) -> Self {
        self.side_a.mmr = mmr_a;
        self.side_b.mmr = mmr_b;
        self
    }

    pub fn with_map(mut self, map: impl Into<String>, duration_seconds: u32) -> Self {
        self.map = map.into();
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn best_effort(mut self) -> Self {
        self.best_effort = true;
        self
    }
}

/// Validated match detail handed to the registry
#[derive(Debug, Clone, PartialEq)]
pub struct MatchMeta {
    pub played_at: NaiveDateTime,
    pub season: Season,
    pub side_a: SideDetail,
    pub side_b: SideDetail,
    pub map: String,
    pub duration_seconds: u32,
}

impl MatchMeta {
    pub fn from_record(record: &MatchRecord, played_at: NaiveDateTime) -> Self {
        Self {
            played_at,
            season: record.season,
            side_a: record.side_a.clone(),
            side_b: record.side_b.clone(),
            map: record.map.clone(),
            duration_seconds: record.duration_seconds,
        }
    }
}
