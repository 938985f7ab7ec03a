//! TradeGame Runner — game service over loaded bar series.
//!
//! This crate builds on `tradegame-core` to provide:
//! - Bar loading from a CSV directory, with opt-in synthetic fallback
//! - Instrument resolution with logged substitution
//! - Session store with pluggable eviction
//! - Game service implementing start / window / turn / restart / benchmark
//! - Typed request/response boundary for adapters
//! - TOML configuration

pub mod config;
pub mod csv_source;
pub mod data_loader;
pub mod protocol;
pub mod service;
pub mod session_store;
pub mod synthetic;

pub use config::{ConfigError, EvictionConfig, GameConfig};
pub use csv_source::CsvDirectorySource;
pub use data_loader::{load_exact, resolve_series, BarSource, DataSource, LoadError, LoadedSeries};
pub use protocol::{handle, handle_json, Command, Request, Response};
pub use service::{
    BenchmarkRow, GameService, RestartedSession, StartedSession, TurnOutcome, WindowView,
};
pub use session_store::{EvictionPolicy, Session, SessionStore};
pub use synthetic::{SyntheticSource, SYNTHETIC_INSTRUMENT};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn game_service_is_send_sync() {
        assert_send::<GameService>();
        assert_sync::<GameService>();
    }

    #[test]
    fn session_store_is_send_sync() {
        assert_send::<SessionStore>();
        assert_sync::<SessionStore>();
        assert_send::<Session>();
        assert_sync::<Session>();
    }

    #[test]
    fn sources_are_send_sync() {
        assert_send::<CsvDirectorySource>();
        assert_sync::<CsvDirectorySource>();
        assert_send::<SyntheticSource>();
        assert_sync::<SyntheticSource>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<GameConfig>();
        assert_sync::<GameConfig>();
        assert_send::<EvictionPolicy>();
        assert_sync::<EvictionPolicy>();
    }
}
