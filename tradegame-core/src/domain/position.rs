//! Position — the player's declared stance for one turn.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Long,
    Short,
    Neutral,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Long, Position::Short, Position::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Long => "long",
            Position::Short => "short",
            Position::Neutral => "neutral",
        }
    }

    /// Sign applied to the raw close-to-close return.
    pub fn direction(&self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
            Position::Neutral => 0.0,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Position::Long),
            "short" => Ok(Position::Short),
            "neutral" => Ok(Position::Neutral),
            other => Err(GameError::InvalidPosition {
                value: other.to_string(),
            }),
        }
    }
}
