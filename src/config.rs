//! Configuration Management
//!
//! Optional defaults read from `<config_dir>/pulumi-stack-outputs/config.json`.

use crate::pulumi::client::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Pulumi access token, used when neither flag nor env var is set
    #[serde(default)]
    pub token: Option<String>,
    /// Pulumi Cloud API base URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Organization used when `read` is given none
    #[serde(default)]
    pub organization: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pulumi-stack-outputs").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Get effective API URL (CLI > config > hosted Pulumi Cloud)
    pub fn effective_api_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get effective organization (CLI > config)
    pub fn effective_organization(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.organization.clone())
    }
}
