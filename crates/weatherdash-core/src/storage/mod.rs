mod config;

pub use config::{
    Config, InteractionConfig, PlaybackConfig, TimelineConfig, WeatherConfig, MAX_DEBOUNCE_MS,
    MAX_STEP_MS, MAX_WINDOW_DAYS,
};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/weatherdash[-dev]/` based on WEATHERDASH_ENV.
///
/// Set WEATHERDASH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WEATHERDASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("weatherdash-dev")
    } else {
        base_dir.join("weatherdash")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
