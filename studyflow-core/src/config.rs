//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/studyflow/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/studyflow/` (~/.config/studyflow/)
//! - State/Logs: `$XDG_STATE_HOME/studyflow/` (~/.local/state/studyflow/)

use crate::analytics::{default_hour_buckets, default_period_windows, default_reward_tiers};
use crate::analytics::{HourBucket, PeriodWindow, RewardTier};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Longest period window accepted from a config file, in days (100 years).
pub const MAX_PERIOD_WINDOW_DAYS: u32 = 36_500;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Where study task rows come from
    #[serde(default)]
    pub source: SourceConfig,

    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Streak reward tiers, ordered by day threshold
    #[serde(default = "default_reward_tiers")]
    pub streak_rewards: Vec<RewardTier>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            analytics: AnalyticsConfig::default(),
            streak_rewards: default_reward_tiers(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Google Apps Script web endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Deployed web app URL (`https://script.google.com/macros/s/.../exec`)
    pub endpoint: Option<String>,

    /// Value of the `action` query parameter that returns study tasks
    #[serde(default = "default_tasks_action")]
    pub tasks_action: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_source_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            tasks_action: default_tasks_action(),
            timeout_secs: default_source_timeout(),
        }
    }
}

impl SourceConfig {
    /// Check if a remote endpoint is configured
    pub fn is_ready(&self) -> bool {
        self.endpoint
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

fn default_tasks_action() -> String {
    "getStudyTasks".to_string()
}

fn default_source_timeout() -> u64 {
    30
}

/// Analytics configuration
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Tasks needed on a calendar day for it to count towards a streak
    #[serde(default = "default_min_tasks_per_day")]
    pub min_tasks_per_day: usize,

    /// Sample floor before a location is ranked or compared
    #[serde(default = "default_min_sample")]
    pub min_tasks_per_location: usize,

    /// Accuracy gap (percentage points) that makes a location pair significant
    #[serde(default = "default_significance_points")]
    pub location_significance_points: u32,

    /// Sample floor before a time-of-day bucket is ranked
    #[serde(default = "default_min_sample")]
    pub min_tasks_per_bucket: usize,

    /// Time-of-day buckets
    #[serde(default = "default_hour_buckets")]
    pub hour_buckets: Vec<HourBucket>,

    /// Named trailing windows for performance trends
    #[serde(default = "default_period_windows")]
    pub period_windows: Vec<PeriodWindow>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            min_tasks_per_day: default_min_tasks_per_day(),
            min_tasks_per_location: default_min_sample(),
            location_significance_points: default_significance_points(),
            min_tasks_per_bucket: default_min_sample(),
            hour_buckets: default_hour_buckets(),
            period_windows: default_period_windows(),
        }
    }
}

fn default_min_tasks_per_day() -> usize {
    1
}

fn default_min_sample() -> usize {
    3
}

fn default_significance_points() -> u32 {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for bucket in &self.analytics.hour_buckets {
            if bucket.start > 24 || bucket.end > 24 {
                return Err(Error::Config(format!(
                    "analytics.hour_buckets: '{}' has hours outside 0-24",
                    bucket.name
                )));
            }
            if !names.insert(bucket.name.as_str()) {
                return Err(Error::Config(format!(
                    "analytics.hour_buckets: duplicate bucket '{}'",
                    bucket.name
                )));
            }
        }

        for window in &self.analytics.period_windows {
            if let Some(days) = window.days {
                if days == 0 || days > MAX_PERIOD_WINDOW_DAYS {
                    return Err(Error::Config(format!(
                        "analytics.period_windows: '{}' must span 1-{} days (omit days for all history)",
                        window.name, MAX_PERIOD_WINDOW_DAYS
                    )));
                }
            }
        }

        if let Some(tier) = self.streak_rewards.iter().find(|t| t.days == 0) {
            return Err(Error::Config(format!(
                "streak_rewards: '{}' must require at least one day",
                tier.label
            )));
        }

        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/studyflow/config.toml` (~/.config/studyflow/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("studyflow").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/studyflow/` (~/.local/state/studyflow/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("studyflow")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// For CLI binaries that want stable path behavior before other
    /// components read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
