use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::GameError;

/// Opaque per-run session token (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// A fresh id guaranteed to differ from `previous`.
    pub fn new_distinct_from(previous: &SessionId) -> Self {
        loop {
            let id = Self::new();
            if id != *previous {
                return id;
            }
        }
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unparseable tokens can never name a live session.
impl FromStr for SessionId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| GameError::SessionNotFound { id: s.to_string() })
    }
}
