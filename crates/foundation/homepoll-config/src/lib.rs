//! Layered configuration for the homepoll service.
//!
//! Load order: built-in defaults, then the YAML config file (explicit
//! path or `<config dir>/homepoll/config.yaml`), then `HOMEPOLL_*`
//! environment overrides. Every field has a working default so the
//! server starts with no file at all (in-memory store, localhost:3000).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which record-store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, for local runs and tests.
    Memory,
    /// REST table backend (Supabase-style PostgREST dialect).
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Base URL of the REST table endpoint; required for `backend: rest`.
    pub url: Option<String>,
    /// API key sent as `apikey` + bearer token; optional.
    pub api_key: Option<String>,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            api_key: None,
            table: "responses".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Heading shown on every survey page.
    pub property_label: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self { property_label: "3561 W Dublin St".into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub survey: SurveyConfig,
}

impl Config {
    /// Load defaults, fold in the YAML file when one exists, then apply
    /// environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Config> {
        let mut config = match explicit_path.map(PathBuf::from).or_else(Self::default_path) {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&raw)?
            }
            // An explicitly named file must exist; the default location is optional.
            Some(path) if explicit_path.is_some() => {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            _ => Config::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("homepoll").join("config.yaml"))
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOMEPOLL_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HOMEPOLL_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("HOMEPOLL_PORT is not a port: {port}")))?;
        }
        if let Ok(backend) = std::env::var("HOMEPOLL_STORE_BACKEND") {
            self.store.backend = match backend.to_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "rest" => StoreBackend::Rest,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "HOMEPOLL_STORE_BACKEND must be memory or rest, got {other}"
                    )))
                }
            };
        }
        if let Ok(url) = std::env::var("HOMEPOLL_STORE_URL") {
            self.store.url = Some(url);
        }
        if let Ok(key) = std::env::var("HOMEPOLL_STORE_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Ok(table) = std::env::var("HOMEPOLL_STORE_TABLE") {
            self.store.table = table;
        }
        if let Ok(label) = std::env::var("HOMEPOLL_PROPERTY_LABEL") {
            self.survey.property_label = label;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::Rest && self.store.url.is_none() {
            return Err(ConfigError::Invalid(
                "store.backend is rest but store.url is not set".into(),
            ));
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Invalid("store.table must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_work_without_any_file() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.table, "responses");
        assert_eq!(config.survey.property_label, "3561 W Dublin St");
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let dir = std::env::temp_dir().join(format!("homepoll_cfg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(
            &path,
            "server:\n  port: 8080\nstore:\n  backend: rest\n  url: https://example.supabase.co/rest/v1\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.store.backend, StoreBackend::Rest);
        assert_eq!(config.store.table, "responses");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rest_backend_without_url_is_rejected() {
        let dir = std::env::temp_dir().join(format!("homepoll_cfg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "store:\n  backend: rest\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("homepoll_does_not_exist.yaml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn env_override_beats_file_value() {
        let dir = std::env::temp_dir().join(format!("homepoll_cfg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "survey:\n  property_label: File Label\n").unwrap();

        std::env::set_var("HOMEPOLL_PROPERTY_LABEL", "Env Label");
        let config = Config::load(Some(&path)).unwrap();
        std::env::remove_var("HOMEPOLL_PROPERTY_LABEL");

        assert_eq!(config.survey.property_label, "Env Label");
        std::fs::remove_dir_all(&dir).ok();
    }
}
