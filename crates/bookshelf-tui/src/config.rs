//! Application configuration management.
//!
//! Configuration is stored at `~/.config/bookshelf/config.json` and holds
//! the remote catalog URL and an optional cache directory override. The
//! `BOOKSHELF_API_URL` environment variable (or `.env` entry) takes
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "bookshelf";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the remote catalog URL
pub const API_URL_ENV: &str = "BOOKSHELF_API_URL";

/// Remote catalog used when nothing else is configured
const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Cache directory used when the platform has no cache location
const FALLBACK_CACHE_DIR: &str = "cache";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Base URL of the remote catalog.
    pub fn api_url(&self) -> String {
        resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api_url.as_deref())
    }

    pub fn cache_dir(&self) -> PathBuf {
        resolve_cache_dir(self.cache_dir.clone(), dirs::cache_dir())
    }
}

/// Configured directory, else the platform cache dir, else `./cache`.
fn resolve_cache_dir(configured: Option<PathBuf>, platform: Option<PathBuf>) -> PathBuf {
    configured
        .or_else(|| platform.map(|dir| dir.join(APP_NAME)))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
}

/// Environment beats config file beats the default. Blank values are skipped.
fn resolve_api_url(env: Option<String>, configured: Option<&str>) -> String {
    let url = env
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(configured.filter(|s| !s.trim().is_empty()))
        .unwrap_or(DEFAULT_API_URL);
    url.trim().trim_end_matches('/').to_string()
}
