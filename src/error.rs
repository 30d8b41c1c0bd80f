//! Error types for the ladder rating core
//!
//! The core returns typed errors so callers can tell a corrupt match apart
//! from a broken rating state. Configuration loading and the binary wrap these
//! in anyhow.

use crate::types::PlayerId;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, LadderError>;

/// Custom error types for specific ladder scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LadderError {
    #[error("Invalid rating state: {reason}")]
    InvalidState { reason: String },

    #[error("Unknown player: {player_id}")]
    UnknownPlayer { player_id: PlayerId },

    #[error("Malformed match: {reason}")]
    MalformedMatch { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl LadderError {
    pub(crate) fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_player(player_id: &str) -> Self {
        Self::UnknownPlayer {
            player_id: player_id.to_string(),
        }
    }
}
