//! Domain types for the trading game

pub mod bar;
pub mod ids;
pub mod position;

pub use bar::{Bar, BarSeries};
pub use ids::SessionId;
pub use position::Position;

/// Instrument identifier type alias
pub type InstrumentId = String;
