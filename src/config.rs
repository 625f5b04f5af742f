//! Configuration loading from TOML files and the environment.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::domain::AlertConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming the record store base URL.
const ENV_STORE_URL: &str = "PRICELENS_STORE_URL";
/// Environment variable naming the record store API key.
const ENV_STORE_KEY: &str = "PRICELENS_STORE_KEY";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
}

/// Connection settings for the hosted record store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store's REST endpoint.
    pub base_url: String,
    /// Project API key sent with every request; row access is still
    /// scoped by the authenticated user's policies.
    pub api_key: String,
}

impl StoreConfig {
    /// Read store settings from the environment, honoring a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when either variable is
    /// absent.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var(ENV_STORE_URL)
            .map_err(|_| ConfigError::MissingField {
                field: ENV_STORE_URL,
            })?;
        let api_key = std::env::var(ENV_STORE_KEY)
            .map_err(|_| ConfigError::MissingField {
                field: ENV_STORE_KEY,
            })?;

        let config = Self { base_url, api_key };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_key" });
        }
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "base_url",
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load and validate a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] variants for unreadable files, parse
    /// failures, and invalid values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.store.validate()?;
        Ok(config)
    }
}
