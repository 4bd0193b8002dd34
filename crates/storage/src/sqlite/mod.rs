use std::time::Duration;

use chrono::Duration as ChronoDuration;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use survey_core::Clock;

mod migrate;
mod session_repo;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// SQLite-backed session store.
///
/// Sessions and their answers live in a small relational schema; the whole
/// record is replaced on every save inside one transaction, which keeps the
/// parallel answers/comments sequences consistent on disk.
#[derive(Clone)]
pub struct SqliteSessionStore {
    pool: SqlitePool,
    clock: Clock,
    ttl: ChronoDuration,
}

impl SqliteSessionStore {
    /// Connect to `SQLite` using the given URL and run migrations.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// the schema cannot be created.
    pub async fn connect(database_url: &str, ttl_secs: i64) -> Result<Self, SqliteInitError> {
        Self::connect_with_clock(database_url, ttl_secs, Clock::default_clock()).await
    }

    /// Like [`SqliteSessionStore::connect`] but with an injected clock for
    /// deterministic expiry in tests.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or
    /// the schema cannot be created.
    pub async fn connect_with_clock(
        database_url: &str,
        ttl_secs: i64,
        clock: Clock,
    ) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        migrate::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            clock,
            ttl: ChronoDuration::seconds(ttl_secs),
        })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
