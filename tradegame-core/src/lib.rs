//! TradeGame Core — domain types, PnL, turn engine, benchmark, scorecard.
//!
//! This crate contains the game logic with no I/O:
//! - Domain types (bars, bar series, positions, session ids)
//! - PnL calculator shared by the turn engine and the benchmark
//! - Game rules and the windowing/termination state machine
//! - Buy-and-hold benchmark over the scored turns
//! - Client-side scorecard for accumulating results

pub mod benchmark;
pub mod domain;
pub mod engine;
pub mod error;
pub mod pnl;
pub mod scorecard;

pub use benchmark::buy_hold_pnl;
pub use domain::{Bar, BarSeries, InstrumentId, Position, SessionId};
pub use engine::{initial_window, submit_turn, GamePhase, GameRules, TurnResult};
pub use error::GameError;
pub use pnl::{compute_pnl, round2};
pub use scorecard::{format_pnl, PnlTone, Scorecard, TradeEntry};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across session-store threads are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Bar>();
        require_sync::<Bar>();
        require_send::<BarSeries>();
        require_sync::<BarSeries>();
        require_send::<SessionId>();
        require_sync::<SessionId>();
        require_send::<GameRules>();
        require_sync::<GameRules>();
        require_send::<TurnResult>();
        require_sync::<TurnResult>();
        require_send::<GameError>();
        require_sync::<GameError>();
    }

    /// The engine only ever borrows the series immutably.
    #[test]
    fn submit_turn_takes_shared_series() {
        fn _check(series: &BarSeries, rules: &GameRules) -> Result<TurnResult, GameError> {
            submit_turn(series, rules, Position::Neutral, 1)
        }
    }
}
