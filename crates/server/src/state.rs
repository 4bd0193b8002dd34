use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use services::ProgressTracker;
use storage::repository::Storage;
use survey_core::model::{Catalog, CatalogError, SurveyDef};

use super::config::Config;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateInitError {
    #[error("failed to read catalog file: {0}")]
    CatalogFile(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Sqlite(#[from] storage::SqliteInitError),
}

/// Shared application state: the tracker (catalog + session store) and the
/// resolved configuration.
pub struct AppState {
    pub tracker: ProgressTracker,
    pub config: Config,
}

impl AppState {
    /// Loads the catalog, opens the session store, and wires up the tracker.
    ///
    /// # Errors
    ///
    /// Returns `StateInitError` if the catalog file cannot be read or parsed
    /// or the SQLite store cannot be opened.
    pub async fn new(config: Config) -> Result<Arc<Self>, StateInitError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!("Loading survey catalog from {path}");
                let raw = std::fs::read_to_string(path)?;
                let defs: Vec<SurveyDef> = serde_json::from_str(&raw)?;
                Catalog::from_defs(defs)?
            }
            None => {
                info!("Using the built-in survey catalog");
                Catalog::builtin()
            }
        };
        info!("Catalog loaded with {} surveys", catalog.len());

        let storage = match &config.db_url {
            Some(url) => {
                info!("Session store: sqlite at {url}");
                Storage::sqlite(url, config.session_ttl_secs).await?
            }
            None => {
                info!("Session store: in-memory");
                Storage::in_memory_with_ttl(config.session_ttl_secs)
            }
        };

        let tracker = ProgressTracker::new(Arc::new(catalog), storage.sessions);
        Ok(Arc::new(Self { tracker, config }))
    }
}
