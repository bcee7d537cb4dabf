//! Application configuration management.
//!
//! This module handles loading and saving the client configuration,
//! which includes the API base URL and the last used email.
//!
//! Configuration is stored at `~/.config/corodesk/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "corodesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where the client points when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    /// Load from the platform config directory.
    pub fn load() -> Result<Self> {
        Ok(Self::load_from(Self::config_dir()?))
    }

    /// Load `config.json` from an explicit directory. A missing or
    /// corrupt file reads as the default config.
    pub fn load_from(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(error) => {
                warn!(%error, path = %path.display(), "discarding corrupt config, using defaults");
                Self::default()
            }
        }
    }

    /// Persist to the platform config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_dir()?)
    }

    /// Write `config.json` into an explicit directory, creating it if
    /// needed.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        let path = dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Base URL to use, in precedence order: `CORODESK_API_URL`
    /// environment variable, then the config file, then the default.
    pub fn resolved_base_url(&self) -> String {
        if let Ok(url) = std::env::var("CORODESK_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Directory where the token session snapshot lives.
    pub fn session_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

// ============================================================================
// Tests
// ============================================================================
