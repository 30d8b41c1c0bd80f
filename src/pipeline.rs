//! Rating-update pipeline
//!
//! Folds a time-ordered ledger into the player registry, one match at a time.
//! Ratings after match N depend on every earlier match, so the fold is strictly
//! sequential and reordering matches changes the result.

use crate::config::{ErrorPolicy, PipelineConfig};
use crate::error::{LadderError, Result};
use crate::rating::MatchRater;
use crate::registry::PlayerRegistry;
use crate::types::{MatchMeta, MatchRecord, PlayerId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// A match left out under `ErrorPolicy::SkipBestEffort`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedMatch {
    /// Position in the ledger
    pub index: usize,
    pub reason: String,
}

/// Statistics about one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub matches_applied: u64,
    pub matches_skipped: u64,
    pub players_created: u64,
    pub first_match_at: Option<NaiveDateTime>,
    pub last_match_at: Option<NaiveDateTime>,
    pub skipped: Vec<SkippedMatch>,
}

/// The rating-update pipeline
#[derive(Debug)]
pub struct RatingPipeline<R: MatchRater> {
    rater: R,
    config: PipelineConfig,
}

impl<R: MatchRater> RatingPipeline<R> {
    pub fn new(rater: R, config: PipelineConfig) -> Self {
        Self { rater, config }
    }

    pub fn rater(&self) -> &R {
        &self.rater
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Apply every match in order.
    ///
    /// Under `FailFast` the first failing match aborts the run. Matches that
    /// were applied before the failure stay applied; rerun from an empty
    /// registry to recover.
    pub fn run<I>(&self, registry: &mut PlayerRegistry, matches: I) -> Result<PipelineStats>
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        let mut stats = PipelineStats::default();

        for (index, record) in matches.into_iter().enumerate() {
            match self.apply(registry, &record, stats.last_match_at) {
                Ok(applied) => {
                    stats.matches_applied += 1;
                    stats.players_created += applied.players_created;
                    stats.first_match_at.get_or_insert(applied.played_at);
                    stats.last_match_at = Some(applied.played_at);
                }
                Err(e)
                    if record.best_effort
                        && self.config.error_policy == ErrorPolicy::SkipBestEffort =>
                {
                    warn!("Skipping best-effort match #{}: {}", index, e);
                    stats.matches_skipped += 1;
                    stats.skipped.push(SkippedMatch {
                        index,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    error!("Aborting ledger at match #{}: {}", index, e);
                    return Err(e);
                }
            }
        }

        info!(
            "Pipeline applied {} matches ({} skipped), {} new players, {} players total",
            stats.matches_applied,
            stats.matches_skipped,
            stats.players_created,
            registry.len()
        );
        Ok(stats)
    }

    /// Apply one match. On error the registry is left as it was.
    fn apply(
        &self,
        registry: &mut PlayerRegistry,
        record: &MatchRecord,
        previous: Option<NaiveDateTime>,
    ) -> Result<AppliedMatch> {
        let played_at = validate_record(record, previous)?;
        let a_won = record.winner.as_deref() == Some(record.player_a.as_str());

        // Check both sides before creating anyone
        let policy = self.config.creation_policy;
        let mut created: Vec<PlayerId> = Vec::new();
        for (id, side) in [
            (&record.player_a, &record.side_a),
            (&record.player_b, &record.side_b),
        ] {
            if !registry.contains(id) {
                if let Err(e) = registry.resolve(id, record.season, side.team.as_deref(), policy) {
                    for id in &created {
                        registry.discard(id);
                    }
                    return Err(e);
                }
                created.push(id.clone());
            }
        }

        let meta = MatchMeta::from_record(record, played_at);
        if let Err(e) =
            registry.record_match(&self.rater, &record.player_a, &record.player_b, a_won, &meta)
        {
            for id in &created {
                registry.discard(id);
            }
            return Err(e);
        }

        for (id, side) in [
            (&record.player_a, &record.side_a),
            (&record.player_b, &record.side_b),
        ] {
            if let Some(team) = side.team.as_deref() {
                registry.set_team(id, record.season, team)?;
            }
        }

        debug!(
            "Applied match at {} in season {}: {} vs {}",
            played_at, record.season, record.player_a, record.player_b
        );
        Ok(AppliedMatch {
            played_at,
            players_created: created.len() as u64,
        })
    }
}

struct AppliedMatch {
    played_at: NaiveDateTime,
    players_created: u64,
}

/// Check a record is complete and in order; returns its timestamp
fn validate_record(record: &MatchRecord, previous: Option<NaiveDateTime>) -> Result<NaiveDateTime> {
    let played_at = record
        .timestamp
        .ok_or_else(|| LadderError::malformed("match has no timestamp"))?;

    if record.player_a.is_empty() || record.player_b.is_empty() {
        return Err(LadderError::malformed("match has an empty player identifier"));
    }
    if record.player_a == record.player_b {
        return Err(LadderError::malformed(format!(
            "player {} cannot play against themselves",
            record.player_a
        )));
    }

    let winner = record
        .winner
        .as_deref()
        .ok_or_else(|| LadderError::malformed("match has no winner"))?;
    if winner != record.player_a && winner != record.player_b {
        return Err(LadderError::malformed(format!(
            "winner {} is not one of {} and {}",
            winner, record.player_a, record.player_b
        )));
    }

    if let Some(previous) = previous {
        if played_at < previous {
            return Err(LadderError::malformed(format!(
                "match at {} is earlier than the previous match at {}",
                played_at, previous
            )));
        }
    }

    Ok(played_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CreationPolicy;
    use crate::rating::{MockMatchRater, StandardMatchRater};
    use crate::types::RatingState;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, day)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn pipeline(error_policy: ErrorPolicy) -> RatingPipeline<StandardMatchRater> {
        RatingPipeline::new(
            StandardMatchRater::default(),
            PipelineConfig {
                error_policy,
                creation_policy: CreationPolicy::Lazy,
            },
        )
    }

    #[test]
    fn test_run_applies_matches() {
        let mut registry = PlayerRegistry::default();
        let matches = vec![
            MatchRecord::new(at(13), "alice", "bob", "alice", 0).with_teams("Red", "Blue"),
            MatchRecord::new(at(14), "bob", "carol", "carol", 0),
        ];

        let stats = pipeline(ErrorPolicy::FailFast)
            .run(&mut registry, matches)
            .unwrap();

        assert_eq!(stats.matches_applied, 2);
        assert_eq!(stats.players_created, 3);
        assert_eq!(stats.first_match_at, Some(at(13)));
        assert_eq!(stats.last_match_at, Some(at(14)));
        assert_eq!(registry.get("bob").unwrap().games().len(), 2);
        assert_eq!(registry.get("alice").unwrap().team_for(0), Some("Red"));
    }

    #[test]
    fn test_malformed_records() {
        let mut no_time = MatchRecord::new(at(13), "alice", "bob", "alice", 0);
        no_time.timestamp = None;
        let mut no_winner = MatchRecord::new(at(13), "alice", "bob", "alice", 0);
        no_winner.winner = None;
        let stranger = MatchRecord::new(at(13), "alice", "bob", "carol", 0);
        let mirror = MatchRecord::new(at(13), "alice", "alice", "alice", 0);

        for record in [no_time, no_winner, stranger, mirror] {
            let mut registry = PlayerRegistry::default();
            let result = pipeline(ErrorPolicy::FailFast).run(&mut registry, vec![record]);
            assert!(matches!(result, Err(LadderError::MalformedMatch { .. })));
            assert!(registry.is_empty());
        }
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut registry = PlayerRegistry::default();
        let matches = vec![
            MatchRecord::new(at(14), "alice", "bob", "alice", 0),
            MatchRecord::new(at(13), "alice", "bob", "bob", 0),
        ];

        let result = pipeline(ErrorPolicy::FailFast).run(&mut registry, matches);
        assert!(matches!(result, Err(LadderError::MalformedMatch { .. })));
        assert_eq!(registry.get("alice").unwrap().games().len(), 1);
    }

    #[test]
    fn test_skip_best_effort_only_when_flagged() {
        let mut broken = MatchRecord::new(at(14), "alice", "bob", "alice", 0).best_effort();
        broken.winner = Some("nobody".to_string());
        let matches = vec![
            MatchRecord::new(at(13), "alice", "bob", "alice", 0),
            broken.clone(),
            MatchRecord::new(at(15), "bob", "alice", "bob", 0),
        ];

        let mut registry = PlayerRegistry::default();
        let stats = pipeline(ErrorPolicy::SkipBestEffort)
            .run(&mut registry, matches.clone())
            .unwrap();
        assert_eq!(stats.matches_applied, 2);
        assert_eq!(stats.matches_skipped, 1);
        assert_eq!(stats.skipped[0].index, 1);
        assert_eq!(registry.get("alice").unwrap().games().len(), 2);

        // Same ledger under fail-fast aborts
        let mut registry = PlayerRegistry::default();
        assert!(pipeline(ErrorPolicy::FailFast)
            .run(&mut registry, matches)
            .is_err());

        // An unflagged broken record aborts even when skipping is allowed
        broken.best_effort = false;
        let mut registry = PlayerRegistry::default();
        assert!(pipeline(ErrorPolicy::SkipBestEffort)
            .run(&mut registry, vec![broken])
            .is_err());
    }

    #[test]
    fn test_failed_rating_leaves_no_trace() {
        let rater = MockMatchRater::new();
        rater.fail_on_call(1);
        let pipeline = RatingPipeline::new(
            rater,
            PipelineConfig {
                error_policy: ErrorPolicy::SkipBestEffort,
                creation_policy: CreationPolicy::Lazy,
            },
        );

        let matches = vec![
            MatchRecord::new(at(13), "alice", "bob", "alice", 0),
            MatchRecord::new(at(14), "carol", "dave", "carol", 0)
                .with_teams("Red", "Blue")
                .best_effort(),
        ];

        let mut registry = PlayerRegistry::default();
        let stats = pipeline.run(&mut registry, matches).unwrap();
        assert_eq!(stats.matches_skipped, 1);
        assert_eq!(stats.players_created, 2);
        assert!(!registry.contains("carol"));
        assert!(!registry.contains("dave"));
        assert_eq!(pipeline.rater().get_calls().len(), 2);
    }

    #[test]
    fn test_registered_only_policy() {
        let pipeline = RatingPipeline::new(
            StandardMatchRater::default(),
            PipelineConfig {
                error_policy: ErrorPolicy::FailFast,
                creation_policy: CreationPolicy::RegisteredOnly,
            },
        );

        let mut registry = PlayerRegistry::new(RatingState::default());
        registry.register("alice", 0, Some("Red"));

        let result = pipeline.run(
            &mut registry,
            vec![MatchRecord::new(at(13), "alice", "ghost", "alice", 0)],
        );
        assert_eq!(
            result,
            Err(LadderError::UnknownPlayer {
                player_id: "ghost".to_string()
            })
        );
        assert!(registry.get("alice").unwrap().games().is_empty());
    }

    #[test]
    fn test_team_refreshed_on_later_season() {
        let mut registry = PlayerRegistry::default();
        let matches = vec![
            MatchRecord::new(at(13), "alice", "bob", "alice", 1).with_teams("Red", "Blue"),
            MatchRecord::new(at(20), "alice", "bob", "bob", 0).with_teams("Green", "Blue"),
        ];

        pipeline(ErrorPolicy::FailFast)
            .run(&mut registry, matches)
            .unwrap();
        let alice = registry.get("alice").unwrap();
        assert_eq!(alice.team_for(1), Some("Red"));
        assert_eq!(alice.team_for(0), Some("Green"));
        assert_eq!(alice.most_recent_team(), "Green");
    }
}
