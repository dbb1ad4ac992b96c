//! Weekplan configuration types and loading

use chrono::Duration;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Category, Period, Priority};
use crate::planner::{DEFAULT_UNDO_WINDOW_SECS, PlannerOptions};
use crate::reports::DEFAULT_REPORTS_KEPT;

/// Environment variable overriding the store directory
pub const STORE_ENV: &str = "WEEKPLAN_STORE";

/// Main Weekplan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Planner behavior
    pub planner: PlannerConfig,

    /// Weekly report retention
    pub reports: ReportsConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.reports.keep == 0 {
            return Err(eyre::eyre!("reports.keep must be at least 1"));
        }
        self.planner.undo_window()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .weekplan.yml
        let local_config = PathBuf::from(".weekplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/weekplan/weekplan.yml
        if let Some(user_config) = user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Log level from the config file, read before logging is set up
    ///
    /// Any failure yields `None`; the full load later reports it.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => std::iter::once(PathBuf::from(".weekplan.yml"))
                .chain(user_config_path())
                .collect(),
        };

        candidates
            .into_iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(&path).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Store directory: `WEEKPLAN_STORE` wins over `storage.path`
    pub fn store_path(&self) -> PathBuf {
        match std::env::var(STORE_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.storage.path.clone(),
        }
    }

    pub fn planner_options(&self) -> Result<PlannerOptions> {
        Ok(PlannerOptions {
            undo_window: self.planner.undo_window()?,
            reports_keep: self.reports.keep,
        })
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("weekplan").join("weekplan.yml"))
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the JSON documents
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/weekplan on Linux)
        let path = dirs::data_local_dir()
            .map(|d| d.join("weekplan").join("store"))
            .unwrap_or_else(|| PathBuf::from(".weekplan"));

        Self { path }
    }
}

/// Planner behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Close out the previous week before running a command
    #[serde(rename = "auto-rollover")]
    pub auto_rollover: bool,

    /// Seconds a clear can be undone; 0 disables expiry
    #[serde(rename = "undo-window-secs")]
    pub undo_window_secs: u64,

    /// Priority for `wp new` when not given
    #[serde(rename = "default-priority")]
    pub default_priority: Priority,

    /// Category for `wp new` when not given
    #[serde(rename = "default-category")]
    pub default_category: Category,

    /// Period for `wp new` when not given
    #[serde(rename = "default-period")]
    pub default_period: Period,
}

impl PlannerConfig {
    /// Undo window as a duration; `None` when expiry is disabled
    pub fn undo_window(&self) -> Result<Option<Duration>> {
        match self.undo_window_secs {
            0 => Ok(None),
            secs => i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .map(Some)
                .ok_or_else(|| eyre::eyre!("planner.undo-window-secs is out of range: {}", secs)),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            auto_rollover: true,
            undo_window_secs: DEFAULT_UNDO_WINDOW_SECS,
            default_priority: Priority::Medium,
            default_category: Category::Work,
            default_period: Period::Morning,
        }
    }
}

/// Weekly report retention
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Number of reports kept, newest first
    pub keep: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            keep: DEFAULT_REPORTS_KEPT,
        }
    }
}
