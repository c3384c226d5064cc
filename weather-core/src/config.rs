use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::WeatherError, provider::openweather::DEFAULT_BASE_URL, units::TemperatureUnit,
    widget::Theme,
};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["OPENWEATHER_API_KEY", "WEATHER_API_KEY"];

/// Query cache tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Entries younger than this are served without a request.
    pub stale_secs: u64,
    /// Entries older than this are dropped.
    pub gc_secs: u64,
    /// Extra attempts after a failed request.
    pub retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_secs: 300,
            gc_secs: 1800,
            retries: 1,
            retry_delay_ms: 500,
        }
    }
}

impl CacheSettings {
    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.gc_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "London"
/// api_key = "..."
/// unit = "fahrenheit"
///
/// [cache]
/// stale_secs = 300
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City shown when the device position is unknown.
    pub city: Option<String>,
    pub api_key: Option<String>,
    pub unit: TemperatureUnit,
    pub theme: Theme,
    /// Override for the provider endpoint, mostly for testing.
    pub base_url: Option<String>,
    pub cache: CacheSettings,
}

impl Config {
    /// Load config from the platform config dir, or return a default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Configured city, or an error hinting at `weather configure`.
    pub fn default_city(&self) -> Result<&str> {
        self.city
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No city configured.\n\
                     Hint: pass a city or run `weather configure` first."
                )
            })
    }

    /// Pick the API key: explicit, then config file, then environment.
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Result<String, WeatherError> {
        self.resolve_api_key_from(explicit, |name| std::env::var(name).ok())
    }

    pub fn resolve_api_key_from(
        &self,
        explicit: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<String, WeatherError> {
        let non_empty = |s: &str| !s.trim().is_empty();

        explicit
            .filter(|k| non_empty(k))
            .map(str::to_owned)
            .or_else(|| self.api_key.clone().filter(|k| non_empty(k)))
            .or_else(|| API_KEY_ENV_VARS.iter().find_map(|name| env(name).filter(|k| non_empty(k))))
            .ok_or(WeatherError::MissingCredential)
    }
}
