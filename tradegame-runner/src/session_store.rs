//! Process-wide session store.
//!
//! Maps session ids to their bound bar series. Sessions from different
//! players live in independent `DashMap` shards, so concurrent creation and
//! lookup never interfere. Bound series are shared as `Arc` and never mutated.
//!
//! Entries are dropped according to an `EvictionPolicy` so a long-running
//! process does not keep every game it has ever served.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tradegame_core::domain::{BarSeries, InstrumentId, SessionId};

use crate::data_loader::{DataSource, LoadedSeries};

/// One player's game: an instrument and the series bound to it.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub instrument: InstrumentId,
    pub series: Arc<BarSeries>,
    pub source: DataSource,
}

impl Session {
    pub fn bind(id: SessionId, loaded: LoadedSeries) -> Self {
        Self {
            id,
            instrument: loaded.instrument,
            series: Arc::new(loaded.series),
            source: loaded.source,
        }
    }
}

/// When stored sessions are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Keep sessions for the life of the process.
    Never,
    /// Drop sessions idle for longer than the given duration.
    TimeToLive(Duration),
    /// Keep at most this many sessions, dropping the least recently used.
    MaxEntries(usize),
}

impl EvictionPolicy {
    fn is_expired(&self, last_access: Instant, now: Instant) -> bool {
        match self {
            EvictionPolicy::TimeToLive(ttl) => now.saturating_duration_since(last_access) > *ttl,
            EvictionPolicy::Never | EvictionPolicy::MaxEntries(_) => false,
        }
    }
}

struct StoredSession {
    session: Arc<Session>,
    last_access: Instant,
}

pub struct SessionStore {
    sessions: DashMap<SessionId, StoredSession>,
    policy: EvictionPolicy,
}

impl SessionStore {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Store `session`, replacing any entry with the same id.
    pub fn insert(&self, session: Session) -> Arc<Session> {
        self.insert_at(session, Instant::now())
    }

    /// Fetch a live session and refresh its last-access time.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.get_at(id, Instant::now())
    }

    /// Fetch `id`, or bind the session produced by `load` under it.
    ///
    /// `load` runs outside any map lock. If another caller binds the same id
    /// first, their session wins and this load is discarded.
    pub fn get_or_insert_with<E>(
        &self,
        id: SessionId,
        load: impl FnOnce(SessionId) -> Result<Session, E>,
    ) -> Result<Arc<Session>, E> {
        if let Some(existing) = self.get(&id) {
            return Ok(existing);
        }

        let now = Instant::now();
        let fresh = Arc::new(load(id)?);
        let session = match self.sessions.entry(id) {
            Entry::Occupied(mut occupied) => {
                let stored = occupied.get_mut();
                stored.last_access = now;
                Arc::clone(&stored.session)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredSession {
                    session: Arc::clone(&fresh),
                    last_access: now,
                });
                fresh
            }
        };
        self.sweep_at(now, Some(&id));
        Ok(session)
    }

    pub fn remove(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.remove(id).map(|(_, stored)| stored.session)
    }

    pub(crate) fn insert_at(&self, session: Session, now: Instant) -> Arc<Session> {
        let session = Arc::new(session);
        self.sessions.insert(
            session.id,
            StoredSession {
                session: Arc::clone(&session),
                last_access: now,
            },
        );
        self.sweep_at(now, Some(&session.id));
        session
    }

    pub(crate) fn get_at(&self, id: &SessionId, now: Instant) -> Option<Arc<Session>> {
        {
            let mut stored = self.sessions.get_mut(id)?;
            if !self.policy.is_expired(stored.last_access, now) {
                stored.last_access = now;
                return Some(Arc::clone(&stored.session));
            }
        }

        let policy = self.policy;
        if self
            .sessions
            .remove_if(id, |_, stored| policy.is_expired(stored.last_access, now))
            .is_some()
        {
            tracing::info!(session_id = %id, "session expired");
        }
        None
    }

    /// Apply the eviction policy, returning how many sessions were dropped.
    ///
    /// Under `MaxEntries`, ties on access time are broken in favour of `keep`.
    pub(crate) fn sweep_at(&self, now: Instant, keep: Option<&SessionId>) -> usize {
        let before = self.sessions.len();
        match self.policy {
            EvictionPolicy::Never => {}
            EvictionPolicy::TimeToLive(_) => {
                let policy = self.policy;
                self.sessions
                    .retain(|_, stored| !policy.is_expired(stored.last_access, now));
            }
            EvictionPolicy::MaxEntries(max) => {
                if before > max {
                    let mut by_age: Vec<(SessionId, Instant)> = self
                        .sessions
                        .iter()
                        .map(|entry| (*entry.key(), entry.value().last_access))
                        .collect();
                    by_age.sort_by_key(|(id, last_access)| (*last_access, Some(id) == keep));
                    for (id, _) in by_age.into_iter().take(before - max) {
                        self.sessions.remove(&id);
                    }
                }
            }
        }

        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            tracing::info!(evicted, remaining = self.sessions.len(), "evicted sessions");
        }
        evicted
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(EvictionPolicy::Never)
    }
}
