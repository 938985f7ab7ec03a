//! Player scorecard: trade history, running total, and result formatting.
//!
//! The engine keeps no per-turn state, so the client side of a game (the
//! CLI here) accumulates results in a `Scorecard`.

use serde::Serialize;

use crate::domain::Position;
use crate::pnl::round2;

/// Sign class of a PnL value, for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PnlTone {
    Positive,
    Negative,
    Flat,
}

impl PnlTone {
    pub fn of(pnl: f64) -> Self {
        if pnl > 0.0 {
            PnlTone::Positive
        } else if pnl < 0.0 {
            PnlTone::Negative
        } else {
            PnlTone::Flat
        }
    }
}

/// `+1.23%`, `-4.50%`, `0.00%`.
pub fn format_pnl(pnl: f64) -> String {
    // Avoid printing "-0.00%".
    let value = if round2(pnl) == 0.0 { 0.0 } else { pnl };
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEntry {
    pub turn: usize,
    pub position: Position,
    pub pnl: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Scorecard {
    entries: Vec<TradeEntry>,
    total: f64,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: usize, position: Position, pnl: f64) {
        self.total += pnl;
        self.entries.push(TradeEntry {
            turn,
            position,
            pnl,
        });
    }

    pub fn entries(&self) -> &[TradeEntry] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        round2(self.total)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total = 0.0;
    }

    /// Rounded total minus the rounded buy-and-hold benchmark.
    pub fn edge(&self, benchmark: f64) -> f64 {
        round2(self.total() - round2(benchmark))
    }

    /// One-line shareable result, with the buy-and-hold comparison when known.
    pub fn summary(&self, instrument: &str, benchmark: Option<f64>) -> String {
        let mut line = format!(
            "{instrument}: final PnL {} over {} turns",
            format_pnl(self.total()),
            self.entries.len()
        );
        if let Some(bh) = benchmark {
            line.push_str(&format!(
                " (buy & hold {}, edge {})",
                format_pnl(bh),
                format_pnl(self.edge(bh))
            ));
        }
        line
    }
}
