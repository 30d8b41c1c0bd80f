//! Match rater trait and implementations
//!
//! A match rater takes both players' complete rating state and one decided
//! result and returns both new states. Nothing is written until every model
//! has produced a valid value, which keeps the three-model update atomic.

use super::elo::elo_update;
use super::glicko::{glicko2_update, GlickoResult};
use super::trueskill::trueskill_update;
use crate::config::RatingConfig;
use crate::error::Result;
use crate::types::RatingState;
use std::sync::Mutex;

/// Trait for rating one head-to-head match
pub trait MatchRater: Send + Sync {
    /// Rate a match between `player_a` and `player_b`
    ///
    /// # Arguments
    /// * `player_a` - current state of the first participant
    /// * `player_b` - current state of the second participant
    /// * `a_won` - whether the first participant won
    ///
    /// # Returns
    /// Both updated states, in argument order
    fn rate_match(
        &self,
        player_a: &RatingState,
        player_b: &RatingState,
        a_won: bool,
    ) -> Result<(RatingState, RatingState)>;

    /// Rating state given to a newly created player
    fn initial_state(&self) -> RatingState;

    /// Model parameters, used by the season pass for long-term Glicko-2
    fn config(&self) -> &RatingConfig;
}

/// Elo + short-term Glicko-2 + TrueSkill, backed by skillratings
#[derive(Debug, Clone)]
pub struct StandardMatchRater {
    config: RatingConfig,
}

impl StandardMatchRater {
    /// Create a new rater
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }
}

impl Default for StandardMatchRater {
    fn default() -> Self {
        Self {
            config: RatingConfig::default(),
        }
    }
}

impl MatchRater for StandardMatchRater {
    fn rate_match(
        &self,
        player_a: &RatingState,
        player_b: &RatingState,
        a_won: bool,
    ) -> Result<(RatingState, RatingState)> {
        let (elo_a, elo_b) = elo_update(&player_a.elo, &player_b.elo, a_won, &self.config)?;

        // Both sides see the other's pre-match Glicko-2 state
        let glicko_a = glicko2_update(
            &player_a.glicko,
            &[GlickoResult::new(&player_b.glicko, a_won)],
            &self.config,
        )?;
        let glicko_b = glicko2_update(
            &player_b.glicko,
            &[GlickoResult::new(&player_a.glicko, !a_won)],
            &self.config,
        )?;

        let (trueskill_a, trueskill_b) =
            trueskill_update(&player_a.trueskill, &player_b.trueskill, a_won, &self.config)?;

        Ok((
            RatingState {
                elo: elo_a,
                glicko: glicko_a,
                trueskill: trueskill_a,
            },
            RatingState {
                elo: elo_b,
                glicko: glicko_b,
                trueskill: trueskill_b,
            },
        ))
    }

    fn initial_state(&self) -> RatingState {
        let mut state = RatingState::default();
        state.elo.rating = self.config.initial_elo;
        state
    }

    fn config(&self) -> &RatingConfig {
        &self.config
    }
}

/// Mock rater for testing: records calls and can be told to fail
#[derive(Debug, Default)]
pub struct MockMatchRater {
    inner: StandardMatchRater,
    calls: Mutex<Vec<(RatingState, RatingState, bool)>>,
    fail_on_call: Mutex<Option<usize>>,
}

impl MockMatchRater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th call (0-based) return an InvalidState error
    pub fn fail_on_call(&self, call: usize) {
        if let Ok(mut fail) = self.fail_on_call.lock() {
            *fail = Some(call);
        }
    }

    /// Get all rate calls made (for testing)
    pub fn get_calls(&self) -> Vec<(RatingState, RatingState, bool)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl MatchRater for MockMatchRater {
    fn rate_match(
        &self,
        player_a: &RatingState,
        player_b: &RatingState,
        a_won: bool,
    ) -> Result<(RatingState, RatingState)> {
        let call = match self.calls.lock() {
            Ok(mut calls) => {
                calls.push((*player_a, *player_b, a_won));
                calls.len() - 1
            }
            Err(_) => 0,
        };

        let should_fail = self
            .fail_on_call
            .lock()
            .map(|fail| *fail == Some(call))
            .unwrap_or(false);
        if should_fail {
            return Err(crate::error::LadderError::InvalidState {
                reason: format!("mock rater failure on call {}", call),
            });
        }

        self.inner.rate_match(player_a, player_b, a_won)
    }

    fn initial_state(&self) -> RatingState {
        self.inner.initial_state()
    }

    fn config(&self) -> &RatingConfig {
        self.inner.config()
    }
}
