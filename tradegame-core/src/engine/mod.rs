//! Game engine — rules, turn scoring, and the visible-window state machine.
//!
//! A game is driven by the caller's turn index:
//!
//! 1. `initial_window` shows bars `[0, window_size)`
//! 2. `submit_turn` scores the position at turn `w` against bar `w - 1`
//! 3. The next window is the `window_size` bars strictly before `w + 1`
//! 4. The game finishes when the series runs out or `total_turns` is reached

pub mod rules;
pub mod turn;

pub use rules::{GameRules, RulesError, DEFAULT_TOTAL_TURNS, DEFAULT_WINDOW_SIZE};
pub use turn::{initial_window, submit_turn, window_before, GamePhase, TurnResult};
