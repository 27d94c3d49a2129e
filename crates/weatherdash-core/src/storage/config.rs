//! TOML-based application configuration.
//!
//! Stores:
//! - Timeline window length, trailing margin and the Range-mode extension
//! - Quiet interval for debounced field edits
//! - Playback step and window size
//! - Weather archive endpoint and hourly variable
//!
//! Configuration is stored at `~/.config/weatherdash/config.toml`.
//! Selections themselves are never persisted.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Timeline extent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_trailing_margin_days")]
    pub trailing_margin_days: u32,
    #[serde(default = "default_range_extension_minutes")]
    pub range_extension_minutes: u32,
}

/// Pointer and field interaction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Playback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_step_ms")]
    pub step_ms: u64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

/// Weather collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_hourly_variable")]
    pub hourly_variable: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/weatherdash/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Longest accepted timeline window, in days.
pub const MAX_WINDOW_DAYS: u32 = 36_500;
/// Longest accepted quiet interval for debounced edits.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;
/// Longest accepted playback step.
pub const MAX_STEP_MS: u64 = 3_600_000;

// Default functions
fn default_window_days() -> u32 {
    30
}
fn default_trailing_margin_days() -> u32 {
    1
}
fn default_range_extension_minutes() -> u32 {
    60
}
fn default_debounce_ms() -> u64 {
    100
}
fn default_step_ms() -> u64 {
    1000
}
fn default_window_size() -> usize {
    10
}
fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".into()
}
fn default_hourly_variable() -> String {
    "temperature_2m".into()
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            trailing_margin_days: default_trailing_margin_days(),
            range_extension_minutes: default_range_extension_minutes(),
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_ms: default_step_ms(),
            window_size: default_window_size(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            hourly_variable: default_hourly_variable(),
        }
    }
}

impl TimelineConfig {
    /// The window must outlast the trailing margin and stay under
    /// [`MAX_WINDOW_DAYS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days <= self.trailing_margin_days {
            return Err(ConfigError::InvalidValue {
                key: "timeline.window_days".into(),
                message: "must be greater than timeline.trailing_margin_days".into(),
            });
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "timeline.window_days".into(),
                message: format!("must be at most {MAX_WINDOW_DAYS}"),
            });
        }
        Ok(())
    }

    pub fn window(&self) -> Duration {
        Duration::days(i64::from(self.window_days.min(MAX_WINDOW_DAYS)))
    }

    pub fn trailing_margin(&self) -> Duration {
        Duration::days(i64::from(self.trailing_margin_days.min(MAX_WINDOW_DAYS)))
    }

    pub fn range_extension(&self) -> Duration {
        Duration::minutes(i64::from(self.range_extension_minutes))
    }
}

impl InteractionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::milliseconds(self.debounce_ms.min(MAX_DEBOUNCE_MS) as i64)
    }
}

impl PlaybackConfig {
    pub fn step(&self) -> Duration {
        Duration::milliseconds(self.step_ms.min(MAX_STEP_MS) as i64)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a boolean")))?,
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                    _ => return Err(unknown()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Reject combinations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeline.validate()?;
        if !(1..=MAX_DEBOUNCE_MS).contains(&self.interaction.debounce_ms) {
            return Err(ConfigError::InvalidValue {
                key: "interaction.debounce_ms".into(),
                message: format!("must be between 1 and {MAX_DEBOUNCE_MS}"),
            });
        }
        if !(1..=MAX_STEP_MS).contains(&self.playback.step_ms) {
            return Err(ConfigError::InvalidValue {
                key: "playback.step_ms".into(),
                message: format!("must be between 1 and {MAX_STEP_MS}"),
            });
        }
        if self.playback.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "playback.window_size".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::debug!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(err) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Unknown keys, mistyped values
    /// and values that fail [`validate`](Self::validate) are rejected and
    /// leave `self` untouched.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

}
