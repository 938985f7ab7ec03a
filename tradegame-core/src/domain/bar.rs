//! Bar — one period of OHLC price data — and the fixed series a game is played on.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::GameError;

/// OHLC record for a single period.
///
/// The date is an opaque label (a calendar date for file-backed data,
/// `Week N` for synthetic data). Bars are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: impl Into<String>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: date.into(),
            open,
            high,
            low,
            close,
        }
    }

    /// Returns true if every OHLC field is finite.
    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }

    /// Basic OHLC sanity check: high >= max(open, close), low <= min(open, close).
    ///
    /// The engine does not enforce this; loaders use it for diagnostics.
    pub fn is_sane(&self) -> bool {
        self.is_finite()
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

/// Ordered bars for one instrument, index 0 earliest.
///
/// Construction enforces the minimum length the game rules need, so a
/// `BarSeries` held by a session is always long enough to play.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Wrap `bars`, failing with `DataUnavailable` if fewer than `min_len`.
    pub fn new(bars: Vec<Bar>, min_len: usize) -> Result<Self, GameError> {
        if bars.len() < min_len {
            return Err(GameError::DataUnavailable {
                reason: format!(
                    "series has {} bars, at least {min_len} required",
                    bars.len()
                ),
            });
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Bars in `range`, clamped to the series bounds.
    pub fn slice(&self, range: Range<usize>) -> &[Bar] {
        let end = range.end.min(self.bars.len());
        let start = range.start.min(end);
        &self.bars[start..end]
    }
}
