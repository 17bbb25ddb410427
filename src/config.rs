//! Client configuration.
//!
//! Selects the backend base URL and remembers the last signed-in email.
//! Stored at `~/.config/nexus-client/config.json`. The `NEXUS_API_URL`
//! environment variable applies when the file sets no explicit base URL.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "nexus-client";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend host used when neither the config file nor the environment says
/// otherwise.
const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Environment variable naming the backend host.
const API_URL_ENV: &str = "NEXUS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the API base URL: explicit config value, then the
    /// `NEXUS_API_URL` environment variable, then the local development
    /// default.
    pub fn api_base(&self) -> String {
        if let Some(ref url) = self.base_url {
            return url.clone();
        }
        std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
    }
}

/// Load a `.env` file if present. Composition roots call this once at
/// startup, before reading any configuration.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
