//! Player registry and per-player records
//!
//! This module owns all player state: ratings, game logs, team mappings and
//! the derived long-term Glicko-2 and Zero Number fields.

pub mod player;
pub mod store;

// Re-export commonly used types
pub use player::{Game, GlickoSnapshot, Player};
pub use store::PlayerRegistry;
