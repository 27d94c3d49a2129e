//! `weatherdash-cli config`: inspect and edit `config.toml`.
//!
//! Keys are dot paths into the TOML tables, e.g. `timeline.window_days` or
//! `weather.hourly_variable`. Edits are validated before they are written.

use clap::Subcommand;
use weatherdash_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dot path, e.g. "timeline.window_days" or "playback.step_ms"
        key: String,
    },
    /// Change one value and write the file
    Set {
        key: String,
        value: String,
    },
    /// Print the whole configuration as JSON
    List,
    /// Print where the configuration file lives
    Path,
    /// Overwrite the file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            tracing::info!("config reset to defaults");
            println!("config reset to defaults");
        }
        action => {
            let mut config = Config::load()?;
            match action {
                ConfigAction::Get { key } => {
                    let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
                    println!("{value}");
                }
                ConfigAction::Set { key, value } => {
                    config.set(&key, &value)?;
                    config.save()?;
                    tracing::info!(%key, %value, "config updated");
                    println!("ok");
                }
                ConfigAction::List => println!("{}", serde_json::to_string_pretty(&config)?),
                ConfigAction::Path | ConfigAction::Reset => {}
            }
        }
    }
    Ok(())
}
