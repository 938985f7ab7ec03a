//! Serializable game service configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid:
//!
//! ```toml
//! data_dir = "data"
//! synthetic_fallback = false
//! # synthetic_seed = 42
//!
//! [rules]
//! total_turns = 32
//! window_size = 16
//!
//! [eviction]
//! policy = "ttl"
//! ttl_secs = 3600
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tradegame_core::engine::{GameRules, RulesError};

use crate::session_store::EvictionPolicy;

/// Default idle time before a session is dropped.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rules: {0}")]
    Rules(#[from] RulesError),

    #[error("invalid eviction settings: {0}")]
    Eviction(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory of per-instrument CSV files.
    pub data_dir: PathBuf,
    /// Serve synthetic bars when no real data can be loaded.
    pub synthetic_fallback: bool,
    /// Fixed seed for synthetic bars. Unset draws a fresh series per session.
    pub synthetic_seed: Option<u64>,
    pub rules: GameRules,
    pub eviction: EvictionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            synthetic_fallback: false,
            synthetic_seed: None,
            rules: GameRules::default(),
            eviction: EvictionConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        self.eviction.policy().map(|_| ())
    }
}

/// Serializable form of `EvictionPolicy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EvictionConfig {
    Never,
    Ttl { ttl_secs: u64 },
    MaxEntries { max_entries: usize },
}

impl Default for EvictionConfig {
    fn default() -> Self {
        EvictionConfig::Ttl {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl EvictionConfig {
    pub fn policy(&self) -> Result<EvictionPolicy, ConfigError> {
        match *self {
            EvictionConfig::Never => Ok(EvictionPolicy::Never),
            EvictionConfig::Ttl { ttl_secs: 0 } => {
                Err(ConfigError::Eviction("ttl_secs must be positive".into()))
            }
            EvictionConfig::Ttl { ttl_secs } => {
                Ok(EvictionPolicy::TimeToLive(Duration::from_secs(ttl_secs)))
            }
            EvictionConfig::MaxEntries { max_entries: 0 } => {
                Err(ConfigError::Eviction("max_entries must be positive".into()))
            }
            EvictionConfig::MaxEntries { max_entries } => {
                Ok(EvictionPolicy::MaxEntries(max_entries))
            }
        }
    }
}
