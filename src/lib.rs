//! Ladder Ratings - standings for a head-to-head competitive ladder
//!
//! This crate folds a time-ordered ledger of match results into per-player
//! Elo, Glicko-2 (short and long term) and TrueSkill ratings, then derives
//! each player's Zero Number: the fewest losses separating them from a
//! reference player.

pub mod config;
pub mod error;
pub mod ladder;
pub mod ledger;
pub mod pipeline;
pub mod rating;
pub mod registry;
pub mod season;
pub mod standings;
pub mod types;
pub mod zero_number;

// Re-export commonly used types and traits
pub use error::{LadderError, Result};
pub use types::*;

// Re-export key components
pub use ladder::{DownstreamSummary, Ladder};
pub use ledger::MatchLedger;
pub use pipeline::{PipelineStats, RatingPipeline};
pub use rating::{MatchRater, StandardMatchRater};
pub use registry::{Game, Player, PlayerRegistry};
pub use standings::Standing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
