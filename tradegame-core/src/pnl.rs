//! PnL calculator: percentage return of a position over one bar-to-bar move.

use crate::domain::{Bar, Position};
use crate::error::GameError;

/// Full-precision percent return of `position` from `prior.close` to `current.close`.
///
/// A neutral position is flat regardless of the bars. Otherwise a zero
/// prior close or a non-finite close fails with `InvalidBar`, labelled with
/// `prior_index`.
pub fn compute_pnl(
    position: Position,
    prior: &Bar,
    current: &Bar,
    prior_index: usize,
) -> Result<f64, GameError> {
    if position == Position::Neutral {
        return Ok(0.0);
    }
    if !prior.close.is_finite() || !current.close.is_finite() {
        return Err(GameError::InvalidBar {
            index: prior_index,
            reason: "non-finite close".into(),
        });
    }
    if prior.close == 0.0 {
        return Err(GameError::InvalidBar {
            index: prior_index,
            reason: "prior close is zero".into(),
        });
    }

    let change_pct = (current.close - prior.close) / prior.close * 100.0;
    Ok(position.direction() * change_pct)
}

/// Round to 2 decimal places for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
