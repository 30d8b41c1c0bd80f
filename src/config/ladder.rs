//! Ladder-level settings: seasons and the Zero Number reference player

use serde::{Deserialize, Serialize};

/// Ladder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderConfig {
    /// Season names, most recent first. Index 0 is the current season.
    pub seasons: Vec<String>,
    /// Identifier of the player every Zero Number is measured from
    pub zero_root: String,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            seasons: Vec::new(),
            zero_root: "zero".to_string(),
        }
    }
}

impl LadderConfig {
    pub fn season_count(&self) -> usize {
        self.seasons.len()
    }

    /// Name of a season index, if configured
    pub fn season_name(&self, season: usize) -> Option<&str> {
        self.seasons.get(season).map(String::as_str)
    }
}
