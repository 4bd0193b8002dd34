#![forbid(unsafe_code)]

//! Session store adapters for the survey application.
//!
//! The tracker talks to a [`repository::SessionStore`] trait object; this
//! crate ships an in-memory implementation for tests and single-process
//! deployments plus a SQLite-backed one for state that survives restarts.
//! Both honor the record TTL.

pub mod repository;
pub mod sqlite;

pub use repository::{InMemorySessionStore, SessionStore, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteSessionStore};
