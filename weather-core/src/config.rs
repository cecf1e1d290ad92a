use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::UnitSystem;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// City fetched on start-up and after a unit toggle when nothing was searched yet.
pub const DEFAULT_CITY: &str = "Delhi";

/// OpenWeather credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,

    /// Overrides the public endpoint, e.g. for a proxy.
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "London"
/// units = "imperial"
///
/// [openweather]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub default_city: Option<String>,
    pub units: Option<UnitSystem>,

    #[serde(default)]
    pub openweather: ProviderConfig,

    /// Value of [`API_KEY_ENV`] captured at load time; never written back.
    #[serde(skip)]
    env_api_key: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// Environment overrides are applied on top.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        Ok(cfg.with_env_api_key(std::env::var(API_KEY_ENV).ok()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply an API key taken from the environment. Blank values are ignored.
    pub fn with_env_api_key(mut self, value: Option<String>) -> Self {
        self.env_api_key = value.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    /// Environment key first, then the stored one.
    pub fn api_key(&self) -> Option<String> {
        self.env_api_key
            .clone()
            .or_else(|| self.openweather.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.openweather.base_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn default_units(&self) -> UnitSystem {
        self.units.unwrap_or_default()
    }
}
