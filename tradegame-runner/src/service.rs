//! Game service: the operations exposed to adapters (CLI, JSON lines, HTTP).
//!
//! Ties together the bar source, the session store, and the turn engine.
//! Session state is read-only once bound, so every failed call leaves the
//! store exactly as it was.

use rand::thread_rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tradegame_core::domain::{Bar, InstrumentId, Position, SessionId};
use tradegame_core::engine::{self, GameRules};
use tradegame_core::{buy_hold_pnl, round2, GameError};

use crate::config::{ConfigError, GameConfig};
use crate::csv_source::CsvDirectorySource;
use crate::data_loader::{load_exact, resolve_series, BarSource, DataSource, LoadedSeries};
use crate::session_store::{EvictionPolicy, Session, SessionStore};
use crate::synthetic::SyntheticSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedSession {
    pub session_id: SessionId,
    pub instrument_id: InstrumentId,
    pub initial_window: Vec<Bar>,
    pub source: DataSource,
    /// True when the requested instrument was replaced by another.
    pub substituted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowView {
    pub window: Vec<Bar>,
    pub instrument_id: InstrumentId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub pnl: f64,
    pub next_window: Option<Vec<Bar>>,
    pub finished: bool,
    pub instrument_id: InstrumentId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartedSession {
    pub session_id: SessionId,
    pub instrument_id: InstrumentId,
    pub substituted: bool,
}

/// Benchmark for one instrument in a `buy_hold_all` sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub instrument_id: InstrumentId,
    pub pnl: Option<f64>,
    pub error: Option<String>,
}

pub struct GameService {
    rules: GameRules,
    store: SessionStore,
    source: Arc<dyn BarSource>,
    fallback: Option<SyntheticSource>,
}

impl GameService {
    pub fn new(source: Arc<dyn BarSource>, rules: GameRules, policy: EvictionPolicy) -> Self {
        Self {
            rules,
            store: SessionStore::new(policy),
            source,
            fallback: None,
        }
    }

    /// Serve synthetic bars when the primary source cannot produce a series.
    ///
    /// With `seed` set every fallback session replays the same walk;
    /// otherwise each session draws its own.
    pub fn with_synthetic_fallback(mut self, seed: Option<u64>) -> Self {
        let bars = self.rules.total_turns;
        self.fallback = Some(match seed {
            Some(seed) => SyntheticSource::seeded(bars, seed),
            None => SyntheticSource::new(bars),
        });
        self
    }

    /// Build a service over a CSV directory as described by `config`.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let source = CsvDirectorySource::new(&config.data_dir);
        tracing::info!(
            data_dir = %source.dir().display(),
            synthetic_fallback = config.synthetic_fallback,
            "game service configured"
        );
        let service = Self::new(Arc::new(source), config.rules, config.eviction.policy()?);
        Ok(if config.synthetic_fallback {
            service.with_synthetic_fallback(config.synthetic_seed)
        } else {
            service
        })
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new game on `hint` (or any available instrument).
    pub fn start_session(&self, hint: Option<&str>) -> Result<StartedSession, GameError> {
        let loaded = self.load(hint)?;
        let substituted = loaded.substituted;
        let session = self.store.insert(Session::bind(SessionId::new(), loaded));

        tracing::info!(
            session_id = %session.id,
            instrument = %session.instrument,
            bars = session.series.len(),
            "session started"
        );

        Ok(StartedSession {
            session_id: session.id,
            instrument_id: session.instrument.clone(),
            initial_window: engine::initial_window(&session.series, &self.rules).to_vec(),
            source: session.source,
            substituted,
        })
    }

    /// Re-fetch the initial window without advancing the game.
    ///
    /// An unknown id is bound to a freshly loaded series under that id.
    pub fn get_window(
        &self,
        session_id: &SessionId,
        hint: Option<&str>,
    ) -> Result<WindowView, GameError> {
        let session = self.store.get_or_insert_with(*session_id, |id| {
            let loaded = self.load(hint)?;
            tracing::info!(session_id = %id, instrument = %loaded.instrument, "session bound on window fetch");
            Ok::<_, GameError>(Session::bind(id, loaded))
        })?;

        Ok(WindowView {
            window: engine::initial_window(&session.series, &self.rules).to_vec(),
            instrument_id: session.instrument.clone(),
        })
    }

    /// Score `position` at `current_turn` for the session's bound series.
    pub fn submit_turn(
        &self,
        session_id: &SessionId,
        position: Position,
        current_turn: i64,
    ) -> Result<TurnOutcome, GameError> {
        let session = self.session(session_id)?;
        let turn = usize::try_from(current_turn).map_err(|_| GameError::OutOfRange {
            index: current_turn,
            len: session.series.len(),
        })?;

        let result = engine::submit_turn(&session.series, &self.rules, position, turn)?;
        tracing::debug!(
            session_id = %session_id,
            turn,
            %position,
            pnl = result.pnl,
            finished = result.finished,
            "turn scored"
        );

        Ok(TurnOutcome {
            pnl: result.pnl,
            next_window: result.next_window,
            finished: result.finished,
            instrument_id: session.instrument.clone(),
        })
    }

    /// Start over under a new session id, dropping the previous session.
    pub fn restart(
        &self,
        previous: Option<&SessionId>,
        hint: Option<&str>,
    ) -> Result<RestartedSession, GameError> {
        let loaded = self.load(hint)?;
        let substituted = loaded.substituted;
        let id = match previous {
            Some(prev) => SessionId::new_distinct_from(prev),
            None => SessionId::new(),
        };
        let session = self.store.insert(Session::bind(id, loaded));

        if let Some(prev) = previous {
            self.store.remove(prev);
        }
        tracing::info!(
            session_id = %session.id,
            previous = ?previous.map(|p| p.to_string()),
            instrument = %session.instrument,
            "session restarted"
        );

        Ok(RestartedSession {
            session_id: session.id,
            instrument_id: session.instrument.clone(),
            substituted,
        })
    }

    /// Buy-and-hold benchmark for exactly `instrument`, rounded to 2 decimals.
    ///
    /// Synthetic bars only stand in when they are seeded; an unseeded walk
    /// has no fixed series to benchmark.
    pub fn buy_hold_pnl(&self, instrument: &str) -> Result<f64, GameError> {
        let loaded = match load_exact(self.source.as_ref(), instrument, &self.rules) {
            Ok(loaded) => loaded,
            Err(err) => match &self.fallback {
                Some(synthetic) if synthetic.is_seeded() => {
                    load_exact(synthetic, instrument, &self.rules).map_err(|_| err)?
                }
                _ => return Err(err.into()),
            },
        };
        Ok(round2(buy_hold_pnl(&loaded.series, &self.rules)?))
    }

    /// Buy-and-hold benchmark over the series bound to `session_id`.
    pub fn session_buy_hold_pnl(&self, session_id: &SessionId) -> Result<f64, GameError> {
        let session = self.session(session_id)?;
        Ok(round2(buy_hold_pnl(&session.series, &self.rules)?))
    }

    /// Benchmark every instrument the primary source offers, in parallel.
    pub fn buy_hold_all(&self) -> Result<Vec<BenchmarkRow>, GameError> {
        let instruments = self.source.instruments()?;
        let rows = instruments
            .par_iter()
            .map(|instrument| {
                let result = load_exact(self.source.as_ref(), instrument, &self.rules)
                    .map_err(GameError::from)
                    .and_then(|loaded| buy_hold_pnl(&loaded.series, &self.rules));
                match result {
                    Ok(pnl) => BenchmarkRow {
                        instrument_id: instrument.clone(),
                        pnl: Some(round2(pnl)),
                        error: None,
                    },
                    Err(err) => BenchmarkRow {
                        instrument_id: instrument.clone(),
                        pnl: None,
                        error: Some(err.to_string()),
                    },
                }
            })
            .collect();
        Ok(rows)
    }

    fn session(&self, session_id: &SessionId) -> Result<Arc<Session>, GameError> {
        self.store
            .get(session_id)
            .ok_or_else(|| GameError::SessionNotFound {
                id: session_id.to_string(),
            })
    }

    fn load(&self, hint: Option<&str>) -> Result<LoadedSeries, GameError> {
        let mut rng = thread_rng();
        match resolve_series(self.source.as_ref(), hint, &self.rules, &mut rng) {
            Ok(loaded) => Ok(loaded),
            Err(err) => match &self.fallback {
                Some(synthetic) => {
                    tracing::warn!(error = %err, "primary data unavailable, using synthetic bars");
                    Ok(resolve_series(synthetic, None, &self.rules, &mut rng)?)
                }
                None => Err(err.into()),
            },
        }
    }
}
