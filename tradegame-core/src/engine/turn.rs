//! Turn engine: scores one turn and computes the next visible window.
//!
//! No turn counter is kept server-side. Every call is reconstructed from the
//! caller-supplied turn index, so the engine is a pure function of
//! `(series, rules, position, turn)` and never mutates the series.

use serde::Serialize;

use crate::domain::{Bar, BarSeries, Position};
use crate::engine::rules::GameRules;
use crate::error::GameError;
use crate::pnl::{compute_pnl, round2};

/// Where a game stands after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    InProgress,
    Finished,
}

/// Outcome of one submitted turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResult {
    /// Percent return, rounded to 2 decimals.
    pub pnl: f64,
    /// Window for the following turn; `None` once the series is exhausted.
    pub next_window: Option<Vec<Bar>>,
    pub finished: bool,
}

impl TurnResult {
    pub fn phase(&self) -> GamePhase {
        if self.finished {
            GamePhase::Finished
        } else {
            GamePhase::InProgress
        }
    }
}

/// Bars shown before any turn: `[0, window_size)`.
pub fn initial_window<'a>(series: &'a BarSeries, rules: &GameRules) -> &'a [Bar] {
    series.slice(0..rules.window_size)
}

/// At most `window_size` bars strictly before `next_index`.
///
/// The bar at `next_index` is the one the player is scored against next, so
/// it is never part of the window.
pub fn window_before<'a>(series: &'a BarSeries, rules: &GameRules, next_index: usize) -> &'a [Bar] {
    let start = next_index.saturating_sub(rules.window_size);
    series.slice(start..next_index)
}

/// Score `position` at `current_turn` and advance by one turn.
pub fn submit_turn(
    series: &BarSeries,
    rules: &GameRules,
    position: Position,
    current_turn: usize,
) -> Result<TurnResult, GameError> {
    let len = series.len();
    let out_of_range = GameError::OutOfRange {
        index: current_turn as i64,
        len,
    };
    let prior_index = match current_turn.checked_sub(1) {
        Some(i) if current_turn < len => i,
        _ => return Err(out_of_range),
    };
    let (Some(prior), Some(current)) = (series.get(prior_index), series.get(current_turn)) else {
        return Err(out_of_range);
    };

    let pnl = round2(compute_pnl(position, prior, current, prior_index)?);
    let next_index = current_turn + 1;

    if next_index >= len {
        return Ok(TurnResult {
            pnl,
            next_window: None,
            finished: true,
        });
    }

    let next_window = window_before(series, rules, next_index).to_vec();
    let finished = current_turn + 2 >= rules.total_turns || next_index >= len;

    Ok(TurnResult {
        pnl,
        next_window: Some(next_window),
        finished,
    })
}
