//! Game rules — the load-bearing constants of the windowing and termination logic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of bars a game spans (display window + scored turns).
pub const DEFAULT_TOTAL_TURNS: usize = 32;

/// Default width of the visible chart window.
pub const DEFAULT_WINDOW_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("window_size must be positive")]
    ZeroWindow,

    #[error("total_turns ({total_turns}) must exceed window_size ({window_size})")]
    TotalNotAboveWindow {
        total_turns: usize,
        window_size: usize,
    },
}

/// Fixed shape of one game.
///
/// The first `window_size` bars form the initial display; turns
/// `window_size..total_turns` are the scored turns. A series must hold at
/// least `total_turns` bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub total_turns: usize,
    pub window_size: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            total_turns: DEFAULT_TOTAL_TURNS,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl GameRules {
    pub fn new(total_turns: usize, window_size: usize) -> Result<Self, RulesError> {
        let rules = Self {
            total_turns,
            window_size,
        };
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.window_size == 0 {
            return Err(RulesError::ZeroWindow);
        }
        if self.total_turns <= self.window_size {
            return Err(RulesError::TotalNotAboveWindow {
                total_turns: self.total_turns,
                window_size: self.window_size,
            });
        }
        Ok(())
    }

    /// Shortest series a session may be bound to.
    pub fn min_series_len(&self) -> usize {
        self.total_turns
    }

    /// First turn index the player is scored on.
    pub fn first_scored_turn(&self) -> usize {
        self.window_size
    }

    /// Last turn index the player is scored on: the closing bar.
    ///
    /// The engine reports `finished` one turn earlier. A full game still
    /// scores this bar, matching the range of the buy-and-hold benchmark.
    pub fn last_scored_turn(&self) -> usize {
        self.total_turns - 1
    }

    /// Number of scored turns in a full game.
    pub fn scored_turns(&self) -> usize {
        self.total_turns - self.window_size
    }
}
