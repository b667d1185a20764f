//! Client configuration management.
//!
//! Loads and saves the console's persisted settings: the backend base URL
//! override, the retry policy knobs, and the last used operator name.
//!
//! Configuration is stored at `~/.config/routecall/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ResilientClient;

/// Application name used for the config directory path
const APP_NAME: &str = "routecall";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend base URL override; the built-in default applies when unset
    pub base_url: Option<String>,
    pub last_operator: Option<String>,
    /// Retry attempt budget for remote calls; policy default when unset
    pub max_attempts: Option<u32>,
    /// Delay between retry attempts in milliseconds; policy default when unset
    pub retry_delay_ms: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
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

    /// Build the retry policy from the configured knobs, falling back to the
    /// policy defaults for anything unset
    pub fn retry_policy(&self) -> ResilientClient {
        let defaults = ResilientClient::default();
        ResilientClient::new(
            self.max_attempts.unwrap_or(defaults.max_attempts()),
            self.retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay()),
        )
    }
}
