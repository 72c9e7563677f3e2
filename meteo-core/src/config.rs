use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{recent::RECENT_FILE_NAME, units::TemperatureUnit};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_HEAT_ALERT_C: f64 = 40.0;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// unit = "fahrenheit"
/// language = "de"
/// heat_alert_c = 38.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit used when displaying temperatures.
    pub unit: TemperatureUnit,

    /// Language for place names returned by geocoding.
    pub language: String,

    /// Current temperature (°C) above which a heat alert is raised.
    pub heat_alert_c: f64,

    /// Override for the geocoding API base URL.
    pub geocoding_url: Option<String>,

    /// Override for the forecast API base URL.
    pub forecast_url: Option<String>,

    /// Override for the recent locations file.
    pub recent_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit: TemperatureUnit::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            heat_alert_c: DEFAULT_HEAT_ALERT_C,
            geocoding_url: None,
            forecast_url: None,
            recent_file: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
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

        Ok(path)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "meteo", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the recent locations file, honouring the `recent_file` override.
    pub fn recent_file_path(&self) -> Result<PathBuf> {
        match &self.recent_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join(RECENT_FILE_NAME)),
        }
    }

    pub fn geocoding_base(&self) -> &str {
        self.geocoding_url
            .as_deref()
            .unwrap_or(DEFAULT_GEOCODING_URL)
            .trim_end_matches('/')
    }

    pub fn forecast_base(&self) -> &str {
        self.forecast_url
            .as_deref()
            .unwrap_or(DEFAULT_FORECAST_URL)
            .trim_end_matches('/')
    }
}
