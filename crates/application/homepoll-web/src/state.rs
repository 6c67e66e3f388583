//! Application state for the survey server.

use homepoll_config::{Config, ConfigError, StoreBackend};
use homepoll_flow::SurveyFlow;
use homepoll_store::{MemoryStore, RecordStore, RestStore};
use std::sync::Arc;

/// Shared per-request context: the store handle, the flow controller
/// bound to it, and the loaded configuration. No visitor state lives
/// here; identity travels in the URL.
pub struct AppState {
    pub flow: SurveyFlow,
    pub store: Arc<dyn RecordStore>,
    pub config: Config,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build the backend the config names and wire the flow to it.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let store: Arc<dyn RecordStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::Rest => {
                let url = config
                    .store
                    .url
                    .as_deref()
                    .ok_or_else(|| ConfigError::Invalid("store.url is required for rest".into()))?;
                Arc::new(
                    RestStore::new(url, config.store.api_key.clone(), &config.store.table)
                        .map_err(|err| ConfigError::Invalid(err.to_string()))?,
                )
            }
        };
        Ok(Self::with_store(config, store))
    }

    /// Wire an explicit store; tests hand in `MemoryStore` or doubles.
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        Self {
            flow: SurveyFlow::new(store.clone()),
            store,
            config,
            started_at: chrono::Utc::now(),
        }
    }

    pub fn property_label(&self) -> &str {
        &self.config.survey.property_label
    }

    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
