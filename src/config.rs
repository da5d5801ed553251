//! Configuration loading and management for precis.
//!
//! Loads settings from `precis.toml` with environment variable overrides for
//! the provider endpoint. The API key is never read from here; it lives in the
//! credential store.

use crate::summary::SummaryOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "precis.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model identifier (e.g., "gpt-3.5-turbo")
    pub model: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

/// Storage paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base path for data storage
    pub path: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Defaults for `summarise` when no flags are given
    #[serde(default)]
    pub summary: SummaryOptions,
}

impl Config {
    /// Load configuration from the default location (precis.toml in cwd or home).
    ///
    /// Falls back to built-in defaults when no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_from(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_from(path)?;
        config.apply_env();
        Ok(config)
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override provider settings from environment variables
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PRECIS_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Ok(model) = std::env::var("PRECIS_MODEL") {
            self.provider.model = model;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("precis")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Directory of the credential database
    pub fn credentials_path(&self) -> PathBuf {
        self.storage.path.join("credentials")
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .map(|dir| dir.join("precis"))
            .unwrap_or_else(|| PathBuf::from("./data"));
        Self { path }
    }
}
