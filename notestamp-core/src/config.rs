//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/notestamp/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/notestamp/` (~/.config/notestamp/)
//! - State/Logs: `$XDG_STATE_HOME/notestamp/` (~/.local/state/notestamp/)

use crate::error::{Error, Result};
use crate::refresh::{RefreshOptions, DEFAULT_MARKER_ATTRIBUTE, DEFAULT_TRIGGER_ATTRIBUTE};
use crate::tooltip::Placement;
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

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
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Timestamp parsing and markup attributes
    #[serde(default)]
    pub timestamps: TimestampConfig,

    /// Recurring refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How timestamps are read from and written to elements
#[derive(Debug, Deserialize, Clone)]
pub struct TimestampConfig {
    /// Attribute holding the raw ISO-8601 timestamp
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,

    /// Attribute set once a tooltip is attached
    #[serde(default = "default_trigger_attribute")]
    pub trigger_attribute: String,

    /// UTC offset (minutes) assumed for timestamps without one
    #[serde(default)]
    pub source_offset_minutes: i32,

    /// UTC offset (minutes) used for the absolute display
    #[serde(default)]
    pub display_offset_minutes: i32,

    /// Where tooltips are drawn (top, bottom, left, right)
    #[serde(default)]
    pub tooltip_placement: Placement,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            marker_attribute: default_marker_attribute(),
            trigger_attribute: default_trigger_attribute(),
            source_offset_minutes: 0,
            display_offset_minutes: 0,
            tooltip_placement: Placement::Top,
        }
    }
}

fn default_marker_attribute() -> String {
    DEFAULT_MARKER_ATTRIBUTE.to_string()
}

fn default_trigger_attribute() -> String {
    DEFAULT_TRIGGER_ATTRIBUTE.to_string()
}

fn offset_from_minutes(field: &str, minutes: i32) -> Result<FixedOffset> {
    if minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(Error::Config(format!(
            "timestamps.{} must be within +/-{} minutes",
            field, MAX_OFFSET_MINUTES
        )));
    }
    FixedOffset::east_opt(minutes * 60)
        .ok_or_else(|| Error::Config(format!("timestamps.{} is out of range", field)))
}

impl TimestampConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.marker_attribute.trim().is_empty() {
            return Err(Error::Config(
                "timestamps.marker_attribute must not be empty".to_string(),
            ));
        }
        if self.trigger_attribute.trim().is_empty() {
            return Err(Error::Config(
                "timestamps.trigger_attribute must not be empty".to_string(),
            ));
        }
        if self.marker_attribute == self.trigger_attribute {
            return Err(Error::Config(
                "timestamps.marker_attribute and timestamps.trigger_attribute must differ"
                    .to_string(),
            ));
        }
        offset_from_minutes("source_offset_minutes", self.source_offset_minutes)?;
        offset_from_minutes("display_offset_minutes", self.display_offset_minutes)?;
        Ok(())
    }

    /// Build the options for a refresh pass
    pub fn refresh_options(&self) -> Result<RefreshOptions> {
        self.validate()?;
        Ok(RefreshOptions {
            marker_attribute: self.marker_attribute.clone(),
            trigger_attribute: self.trigger_attribute.clone(),
            source_offset: offset_from_minutes(
                "source_offset_minutes",
                self.source_offset_minutes,
            )?,
            display_offset: offset_from_minutes(
                "display_offset_minutes",
                self.display_offset_minutes,
            )?,
            tooltip_placement: self.tooltip_placement,
        })
    }
}

/// Recurring refresh configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    /// Seconds between passes in watch mode
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

fn default_interval_secs() -> u64 {
    60
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

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.timestamps.validate()?;
        if self.refresh.interval_secs == 0 {
            return Err(Error::Config(
                "refresh.interval_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/notestamp/config.toml` (~/.config/notestamp/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("notestamp").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/notestamp/` (~/.local/state/notestamp/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("notestamp")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/notestamp/notestamp.log` (~/.local/state/notestamp/notestamp.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("notestamp.log")
    }
}
