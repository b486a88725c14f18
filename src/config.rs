//! Wizard configuration, loaded from an optional JSON file.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const API_URL_ENV: &str = "TRIP_WIZARD_API_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid api base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardConfig {
    /// Root of the travel API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_countries_path")]
    pub countries_path: String,
    #[serde(default = "default_cities_path")]
    pub cities_path: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/".to_string()
}

fn default_countries_path() -> String {
    "api/TravelApp/countries".to_string()
}

fn default_cities_path() -> String {
    "api/TravelApp/cities".to_string()
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            countries_path: default_countries_path(),
            cities_path: default_cities_path(),
        }
    }
}

impl WizardConfig {
    /// Load from `path` (defaults when absent), then apply the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields defaults; an unparseable one is logged and replaced by defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        match serde_json::from_str::<WizardConfig>(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                log::warn!(
                    "failed to parse config, falling back to defaults. path: {}, error: {}",
                    path.display(),
                    err
                );
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url().map(|_| ())
    }

    /// Base URL with a trailing slash so relative paths join beneath it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })
    }
}
