//! Buy-and-hold benchmark over the scored portion of a game.

use crate::domain::{BarSeries, Position};
use crate::engine::GameRules;
use crate::error::GameError;
use crate::pnl::compute_pnl;

/// Cumulative long PnL over turns `window_size..min(total_turns, len)`.
///
/// Uses the same per-turn formula as the turn engine, summed at full
/// precision; round at the point of reporting.
pub fn buy_hold_pnl(series: &BarSeries, rules: &GameRules) -> Result<f64, GameError> {
    let end = rules.total_turns.min(series.len());
    let bars = series.bars();

    (rules.first_scored_turn().max(1)..end).try_fold(0.0, |total, i| {
        let pnl = compute_pnl(Position::Long, &bars[i - 1], &bars[i], i - 1)?;
        Ok::<f64, GameError>(total + pnl)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn series_of(closes: &[f64]) -> BarSeries {
        let bars = closes
            .iter()
            .map(|&c| Bar::new("d", c, c, c, c))
            .collect();
        BarSeries::new(bars, 1).unwrap()
    }

    #[test]
    fn flat_series_has_zero_benchmark() {
        let series = series_of(&vec![50.0; 32]);
        assert_eq!(buy_hold_pnl(&series, &GameRules::default()).unwrap(), 0.0);
    }

    #[test]
    fn only_scored_turns_contribute() {
        // Moves inside the initial window are ignored; only 15→16 counts here.
        let mut closes = vec![100.0; 32];
        closes[3] = 400.0;
        for c in closes.iter_mut().skip(16) {
            *c = 110.0;
        }
        let pnl = buy_hold_pnl(&series_of(&closes), &GameRules::default()).unwrap();
        assert!((pnl - 10.0).abs() < 1e-9);
    }

    #[test]
    fn bars_after_total_turns_are_ignored() {
        let mut closes = vec![100.0; 40];
        closes[35] = 1.0;
        let pnl = buy_hold_pnl(&series_of(&closes), &GameRules::default()).unwrap();
        assert_eq!(pnl, 0.0);
    }

    #[test]
    fn zero_close_in_scored_range_fails() {
        let mut closes = vec![100.0; 32];
        closes[20] = 0.0;
        let err = buy_hold_pnl(&series_of(&closes), &GameRules::default()).unwrap_err();
        assert!(matches!(err, GameError::InvalidBar { index: 20, .. }));
    }
}
