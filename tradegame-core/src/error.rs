//! Error taxonomy shared by the engine and every adapter above it.

use thiserror::Error;

/// Every failure the game can report.
///
/// None of these mutate session state: the turn engine only reads the
/// session, so a failed call has nothing to roll back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("data unavailable: {reason}")]
    DataUnavailable { reason: String },

    #[error("invalid position '{value}' (expected long, short, or neutral)")]
    InvalidPosition { value: String },

    #[error("invalid turn index: {reason}")]
    InvalidTurnIndex { reason: String },

    #[error("turn index {index} out of range for series of {len} bars")]
    OutOfRange { index: i64, len: usize },

    #[error("session '{id}' not found (start or restart a game)")]
    SessionNotFound { id: String },

    #[error("invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },
}

impl GameError {
    /// Stable machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::DataUnavailable { .. } => "data_unavailable",
            GameError::InvalidPosition { .. } => "invalid_position",
            GameError::InvalidTurnIndex { .. } => "invalid_turn_index",
            GameError::OutOfRange { .. } => "out_of_range",
            GameError::SessionNotFound { .. } => "session_not_found",
            GameError::InvalidBar { .. } => "invalid_bar",
        }
    }
}
