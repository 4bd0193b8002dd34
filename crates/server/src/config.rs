use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use storage::repository::DEFAULT_TTL_SECS;

/// Server configuration, read from environment variables with logged
/// fallbacks to defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`SURVEY_PORT`).
    pub port: u16,
    /// Session record and cookie lifetime in seconds
    /// (`SURVEY_SESSION_TTL_SECS`).
    pub session_ttl_secs: i64,
    /// Optional path to a JSON catalog file (`SURVEY_CATALOG`); the built-in
    /// catalog is used when unset.
    pub catalog_path: Option<String>,
    /// Optional SQLite URL for the session store (`SURVEY_DB_URL`); sessions
    /// stay in process memory when unset.
    pub db_url: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self {
            port: try_load("SURVEY_PORT", "8080"),
            session_ttl_secs: try_load("SURVEY_SESSION_TTL_SECS", &DEFAULT_TTL_SECS.to_string()),
            catalog_path: var("SURVEY_CATALOG").ok(),
            db_url: var("SURVEY_DB_URL").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            session_ttl_secs: DEFAULT_TTL_SECS,
            catalog_path: None,
            db_url: None,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|()| default.to_string())
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
