//! Ladder run orchestration
//!
//! Wires the pipeline, the season pass and the Zero Number engine together in
//! the order the data requires: every match first, then the two downstream
//! passes, which read disjoint data and may run side by side.

use crate::config::AppConfig;
use crate::error::{LadderError, Result};
use crate::pipeline::{PipelineStats, RatingPipeline};
use crate::rating::{MatchRater, StandardMatchRater};
use crate::registry::PlayerRegistry;
use crate::season;
use crate::standings::{build_standings, Standing};
use crate::types::{MatchRecord, PlayerId, ZeroNumber};
use crate::zero_number;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Outcome of the downstream passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownstreamSummary {
    /// Seasons covered by the long-term Glicko-2 pass
    pub seasons: usize,
    pub zero_root: PlayerId,
    pub zero_numbers: HashMap<PlayerId, ZeroNumber>,
}

/// One ladder run: ingest matches, then finalize
#[derive(Debug)]
pub struct Ladder<R: MatchRater = StandardMatchRater> {
    config: AppConfig,
    registry: PlayerRegistry,
    pipeline: RatingPipeline<R>,
    finalized: bool,
}

impl Ladder<StandardMatchRater> {
    /// Create a ladder with the standard skillratings-backed rater
    pub fn new(config: AppConfig) -> Result<Self> {
        let rater = StandardMatchRater::new(config.rating.clone())?;
        Ok(Self::with_rater(config, rater))
    }
}

impl<R: MatchRater> Ladder<R> {
    pub fn with_rater(config: AppConfig, rater: R) -> Self {
        let registry = PlayerRegistry::new(rater.initial_state());
        let pipeline = RatingPipeline::new(rater, config.pipeline);
        Self {
            config,
            registry,
            pipeline,
            finalized: false,
        }
    }

    /// Pre-register a player, for runs under `CreationPolicy::RegisteredOnly`
    pub fn register(&mut self, id: &str, season: usize, team: Option<&str>) {
        self.registry.register(id, season, team);
    }

    /// Fold a batch of matches into the registry
    pub fn ingest<I>(&mut self, matches: I) -> Result<PipelineStats>
    where
        I: IntoIterator<Item = MatchRecord>,
    {
        if self.finalized {
            return Err(LadderError::InvalidState {
                reason: "matches cannot be added after the ladder is finalized".to_string(),
            });
        }
        self.pipeline.run(&mut self.registry, matches)
    }

    /// Run the season aggregation and Zero Number passes.
    ///
    /// Both are computed against the same registry snapshot in parallel and
    /// then written back; neither reads what the other writes. The long-term
    /// ratings are applied even when the Zero Number root is missing, in which
    /// case the error is returned afterwards and the ladder stays open.
    pub fn finalize(&mut self) -> Result<DownstreamSummary> {
        let seasons = season::season_span(&self.registry, self.config.ladder.season_count());
        let root = self.config.ladder.zero_root.clone();
        let rating_config = self.pipeline.rater().config();

        let registry = &self.registry;
        let (long_term, zero_numbers) = rayon::join(
            || season::compute_long_term(registry, seasons, rating_config),
            || zero_number::compute_zero_numbers(registry, &root),
        );
        season::apply_long_term(&mut self.registry, long_term?)?;
        let zero_numbers = zero_numbers.map_err(|e| {
            warn!("Zero Numbers not assigned: {}", e);
            e
        })?;
        zero_number::apply_zero_numbers(&mut self.registry, &zero_numbers)?;
        self.finalized = true;

        info!(
            "Finalized ladder: {} players, {} seasons, root {}",
            self.registry.len(),
            seasons,
            root
        );
        Ok(DownstreamSummary {
            seasons,
            zero_root: root,
            zero_numbers,
        })
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn standings(&self) -> Vec<Standing> {
        build_standings(&self.registry)
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn into_registry(self) -> PlayerRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, day)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_full_run() {
        let mut ladder = Ladder::new(AppConfig::default()).unwrap();
        let stats = ladder
            .ingest(vec![
                MatchRecord::new(at(13), "a", "zero", "zero", 0),
                MatchRecord::new(at(14), "b", "a", "a", 0),
                MatchRecord::new(at(15), "c", "d", "c", 0),
            ])
            .unwrap();
        assert_eq!(stats.matches_applied, 3);

        let summary = ladder.finalize().unwrap();
        assert_eq!(summary.seasons, 1);
        assert_eq!(summary.zero_numbers["b"], ZeroNumber::Reachable(2));
        assert_eq!(summary.zero_numbers["c"], ZeroNumber::Unreachable);
        assert!(ladder.is_finalized());

        let registry = ladder.registry();
        assert_eq!(
            registry.get("a").unwrap().zero_number(),
            ZeroNumber::Reachable(1)
        );
        assert!(registry.get("zero").unwrap().long_term_glicko().rating > 1500.0);
    }

    #[test]
    fn test_ingest_after_finalize_rejected() {
        let mut ladder = Ladder::new(AppConfig::default()).unwrap();
        ladder
            .ingest(vec![MatchRecord::new(at(13), "a", "zero", "zero", 0)])
            .unwrap();
        ladder.finalize().unwrap();

        let result = ladder.ingest(vec![MatchRecord::new(at(14), "a", "zero", "a", 0)]);
        assert!(matches!(result, Err(LadderError::InvalidState { .. })));
    }

    #[test]
    fn test_finalize_without_root() {
        let mut ladder = Ladder::new(AppConfig::default()).unwrap();
        ladder
            .ingest(vec![MatchRecord::new(at(13), "a", "b", "a", 0)])
            .unwrap();
        assert!(matches!(
            ladder.finalize(),
            Err(LadderError::UnknownPlayer { .. })
        ));
        assert!(!ladder.is_finalized());

        // The season pass result survives the missing root
        let registry = ladder.registry();
        assert!(registry.get("a").unwrap().long_term_glicko().rating > 1500.0);
        assert!(registry.get("b").unwrap().long_term_glicko().rating < 1500.0);
        assert_eq!(
            registry.get("a").unwrap().zero_number(),
            ZeroNumber::Unreachable
        );
    }
}
