//! Bar series loading and instrument resolution.
//!
//! A `BarSource` lists instruments and loads their bars. Resolution applies
//! the substitution policy:
//! 1. If the hinted instrument exists → load it
//! 2. If there is no hint, or it is unknown → pick a random available instrument
//!    (logged as a substitution when a hint was given)
//! 3. If nothing is available, or the series is shorter than the game → fail
//!
//! Callers must use the instrument id in `LoadedSeries`, never the hint.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tradegame_core::domain::{Bar, BarSeries, InstrumentId};
use tradegame_core::engine::GameRules;
use tradegame_core::GameError;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data source at '{}'", path.display())]
    NoDataSource { path: PathBuf },

    #[error("data source contains no instruments")]
    NoInstruments,

    #[error("unknown instrument '{instrument}'")]
    UnknownInstrument { instrument: String },

    #[error("'{instrument}' is missing required column '{column}'")]
    MissingColumn { instrument: String, column: String },

    #[error("'{instrument}' row {row}: {reason}")]
    Parse {
        instrument: String,
        row: usize,
        reason: String,
    },

    #[error("'{instrument}' has {bars} bars, at least {required} required")]
    TooShort {
        instrument: String,
        bars: usize,
        required: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<LoadError> for GameError {
    fn from(err: LoadError) -> Self {
        GameError::DataUnavailable {
            reason: err.to_string(),
        }
    }
}

/// Where a session's bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvFile,
    Synthetic,
}

/// Trait for bar sources (CSV directory, synthetic generator, test fixtures).
pub trait BarSource: Send + Sync {
    /// Kind of data this source produces.
    fn kind(&self) -> DataSource;

    /// All instrument ids this source can load, in a stable order.
    fn instruments(&self) -> Result<Vec<InstrumentId>, LoadError>;

    /// Load every bar for `instrument`, earliest first.
    fn load(&self, instrument: &str) -> Result<Vec<Bar>, LoadError>;
}

/// A resolved, length-checked series ready to bind to a session.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    /// The instrument actually loaded (may differ from the hint).
    pub instrument: InstrumentId,
    pub series: BarSeries,
    pub source: DataSource,
    /// True when a hint was given but a different instrument was chosen.
    pub substituted: bool,
}

/// Resolve `hint` against `source`, substituting a random instrument if needed.
pub fn resolve_series<R: Rng + ?Sized>(
    source: &dyn BarSource,
    hint: Option<&str>,
    rules: &GameRules,
    rng: &mut R,
) -> Result<LoadedSeries, LoadError> {
    let instruments = source.instruments()?;

    let requested = hint.filter(|h| instruments.iter().any(|i| i == h));
    let (instrument, substituted) = match requested {
        Some(h) => (h.to_string(), false),
        None => {
            let picked = instruments.choose(rng).ok_or(LoadError::NoInstruments)?;
            if let Some(h) = hint {
                tracing::warn!(
                    requested = h,
                    resolved = %picked,
                    "requested instrument not found, substituting"
                );
            }
            (picked.clone(), hint.is_some())
        }
    };

    let series = load_checked(source, &instrument, rules)?;
    Ok(LoadedSeries {
        instrument,
        series,
        source: source.kind(),
        substituted,
    })
}

/// Load exactly `instrument`, never substituting.
pub fn load_exact(
    source: &dyn BarSource,
    instrument: &str,
    rules: &GameRules,
) -> Result<LoadedSeries, LoadError> {
    let instruments = source.instruments()?;
    if !instruments.iter().any(|i| i == instrument) {
        return Err(LoadError::UnknownInstrument {
            instrument: instrument.to_string(),
        });
    }
    let series = load_checked(source, instrument, rules)?;
    Ok(LoadedSeries {
        instrument: instrument.to_string(),
        series,
        source: source.kind(),
        substituted: false,
    })
}

fn load_checked(
    source: &dyn BarSource,
    instrument: &str,
    rules: &GameRules,
) -> Result<BarSeries, LoadError> {
    let bars = source.load(instrument)?;
    let count = bars.len();
    let required = rules.min_series_len();

    let insane = bars.iter().filter(|b| !b.is_sane()).count();
    if insane > 0 {
        tracing::debug!(instrument, insane, "series contains bars failing OHLC sanity");
    }

    BarSeries::new(bars, required).map_err(|_| LoadError::TooShort {
        instrument: instrument.to_string(),
        bars: count,
        required,
    })
}
