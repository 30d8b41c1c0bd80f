//! Rating models: Elo, Glicko-2 and TrueSkill
//!
//! Each model is a pure update function with input validation on top of the
//! skillratings crate. The calculator combines them into one per-match update.

pub mod calculator;
pub mod elo;
pub mod glicko;
pub mod trueskill;
mod validate;

// Re-export commonly used types
pub use calculator::{MatchRater, MockMatchRater, StandardMatchRater};
pub use elo::elo_update;
pub use glicko::{did_not_compete, glicko2_update, GlickoResult};
pub use trueskill::trueskill_update;
