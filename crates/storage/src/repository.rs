use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use survey_core::Clock;
use survey_core::model::{ProgressRecord, SessionId};

/// Default record lifetime: one day, matching the session cookie.
pub const DEFAULT_TTL_SECS: i64 = 86_400;

/// Errors surfaced by session store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Store contract for per-visitor progress records.
///
/// `load` returns `None` both for unknown sessions and for records past
/// their TTL; `save` refreshes the TTL from the store's clock. There is no
/// delete: records only leave through expiry.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the record for a session, if present and not expired.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached or the
    /// persisted state fails to rehydrate.
    async fn load(&self, id: SessionId) -> Result<Option<ProgressRecord>, StorageError>;

    /// Persist the record for a session, refreshing its expiry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, id: SessionId, record: &ProgressRecord) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
struct StoredRecord {
    record: ProgressRecord,
    expires_at: DateTime<Utc>,
}

/// In-memory session store with lazy TTL expiry.
///
/// Good enough for tests and single-process deployments; offers no
/// cross-request locking, so concurrent submissions from one visitor are a
/// documented last-write-wins limitation.
#[derive(Clone)]
pub struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, StoredRecord>>>,
    clock: Clock,
    ttl: Duration,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Clock::default_clock(), DEFAULT_TTL_SECS)
    }

    /// Store with an injected clock and TTL, for deterministic expiry tests.
    #[must_use]
    pub fn with_clock(clock: Clock, ttl_secs: i64) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            clock,
            ttl: Duration::seconds(ttl_secs),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: SessionId) -> Result<Option<ProgressRecord>, StorageError> {
        let now = self.clock.now();
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match guard.get(&id) {
            Some(stored) if stored.expires_at <= now => {
                guard.remove(&id);
                Ok(None)
            }
            Some(stored) => Ok(Some(stored.record.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, id: SessionId, record: &ProgressRecord) -> Result<(), StorageError> {
        let expires_at = self.clock.now() + self.ttl;
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            id,
            StoredRecord {
                record: record.clone(),
                expires_at,
            },
        );
        Ok(())
    }
}

/// Aggregates the session store behind a trait object for backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::in_memory_with_ttl(DEFAULT_TTL_SECS)
    }

    #[must_use]
    pub fn in_memory_with_ttl(ttl_secs: i64) -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::with_clock(
                Clock::default_clock(),
                ttl_secs,
            )),
        }
    }

    /// SQLite-backed storage at the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the pool cannot be opened or migrations
    /// fail.
    pub async fn sqlite(database_url: &str, ttl_secs: i64) -> Result<Self, crate::SqliteInitError> {
        let store = crate::SqliteSessionStore::connect(database_url, ttl_secs).await?;
        Ok(Self {
            sessions: Arc::new(store),
        })
    }
}
