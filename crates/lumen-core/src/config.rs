//! Configuration for the studio: gateway credentials, model selection, and
//! storage locations. Supports YAML configuration files with serde defaults;
//! a missing file simply yields the defaults.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::StudioError;

/// Environment variable consulted when no explicit key is configured.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GENERATE_MODEL: &str = "imagen-4.0-generate-001";
const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Explicit API key. Prefer `api_key_env` to keep keys out of files.
    pub api_key: Option<String>,
    /// Name of an environment variable holding the key.
    pub api_key_env: Option<String>,
    pub generate_model: String,
    pub edit_model: String,
    pub base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
            generate_model: DEFAULT_GENERATE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Resolution order: explicit value, named environment variable, then
    /// the default `GEMINI_API_KEY` variable. The failure message must keep
    /// mentioning the API key: the error classifier keys off it.
    pub fn resolve_api_key(&self) -> Result<String, StudioError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        if let Some(env_var) = &self.api_key_env {
            return env::var(env_var).map_err(|_| {
                StudioError::Config(format!(
                    "Environment variable {} not found for Gemini API key",
                    env_var
                ))
            });
        }
        env::var(DEFAULT_API_KEY_ENV).map_err(|_| {
            StudioError::Config(format!(
                "No API key found for Gemini. Set {} environment variable or provide api_key in config",
                DEFAULT_API_KEY_ENV
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StudioConfig {
    pub gateway: GatewayConfig,
    /// Override for the history file location.
    pub history_path: Option<PathBuf>,
    pub thumbnail_max_dimension: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            history_path: None,
            thumbnail_max_dimension: crate::codec::THUMBNAIL_MAX_DIMENSION,
        }
    }
}

impl StudioConfig {
    /// Loads a YAML configuration file. A missing file is not an error;
    /// defaults apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StudioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&raw)
            .map_err(|e| StudioError::Config(format!("Invalid configuration file: {}", e)))
    }

    /// The effective history file path: the configured override, or
    /// `history.json` under the platform data directory.
    pub fn history_path(&self) -> PathBuf {
        if let Some(path) = &self.history_path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("lumen").join("history.json"))
            .unwrap_or_else(|| PathBuf::from("history.json"))
    }
}
