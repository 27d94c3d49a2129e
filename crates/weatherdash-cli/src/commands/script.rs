//! Scripted interaction replay.
//!
//! Each non-blank, non-comment line is one gesture, field edit or store
//! command. Every event it produces is printed as one JSON line. The session
//! runs on a manual clock that only moves on `tick <ms>`.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};
use weatherdash_core::clock::ManualClock;
use weatherdash_core::storage::WeatherConfig;
use weatherdash_core::timeline::truncate_to_millis;
use weatherdash_core::{
    BoundsAuthority, Centroid, Clock, Config, Event, Handle, InteractionSurface, RegionOfInterest,
    SelectionMode, SelectionStore,
};

const USAGE: &str = "mode single|range|toggle, press start|end <pos>, track <pos>, move <pos>, up, \
date start|end YYYY-MM-DD, time start|end HH:MM, tick <ms>, region <lon> <lat> [area], \
clear-region, reset, show, query";

pub struct Session {
    clock: Arc<ManualClock>,
    store: SelectionStore,
    surface: InteractionSurface,
    weather: WeatherConfig,
}

impl Session {
    pub fn new(config: &Config, now: DateTime<Utc>) -> Result<Self, Box<dyn std::error::Error>> {
        let clock = ManualClock::shared(truncate_to_millis(now));
        let authority = BoundsAuthority::new(clock.clone(), &config.timeline)?;
        let store = SelectionStore::from_config(&authority, clock.clone(), &config.timeline);
        let surface =
            InteractionSurface::from_config(store.bounds(), clock.clone(), &config.interaction);
        Ok(Self {
            clock,
            store,
            surface,
            weather: config.weather.clone(),
        })
    }

    /// Run one script line and return what it printed.
    pub fn apply(&mut self, line: &str) -> Result<Vec<Value>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Vec::new());
        }
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        tracing::debug!(command, ?args, "replaying");

        let events: Vec<Event> = match (command, args.as_slice()) {
            ("mode", ["toggle"]) => self.store.toggle_mode().into_iter().collect(),
            ("mode", [mode]) => {
                let mode: SelectionMode = mode.parse()?;
                self.store.set_mode(mode).into_iter().collect()
            }
            ("press", [handle, pos]) => {
                let handle: Handle = handle.parse()?;
                vec![self.surface.pointer_down(handle, parse_position(pos)?, &self.store)]
            }
            ("track", [pos]) => vec![self.surface.track_press(parse_position(pos)?, &self.store)],
            ("move", [pos]) => self
                .surface
                .pointer_move(parse_position(pos)?)
                .into_iter()
                .collect(),
            ("up", []) => self.surface.pointer_up(&mut self.store).into_iter().collect(),
            ("date", [field, date]) => {
                let field: Handle = field.parse()?;
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| format!("invalid date '{date}': {e}"))?;
                self.surface
                    .edit_date(field, date, &self.store)
                    .into_iter()
                    .collect()
            }
            ("time", [field, text]) => {
                let field: Handle = field.parse()?;
                self.surface
                    .edit_time(field, text, &self.store)
                    .into_iter()
                    .collect()
            }
            ("tick", [ms]) => {
                let ms: i64 = ms.parse().map_err(|_| format!("invalid milliseconds '{ms}'"))?;
                if ms < 0 {
                    return Err("tick cannot move the clock backwards".into());
                }
                chrono::TimeDelta::try_milliseconds(ms)
                    .and_then(|by| self.clock.now().checked_add_signed(by))
                    .ok_or_else(|| format!("tick of {ms} ms moves the clock out of range"))?;
                self.clock.advance_ms(ms);
                self.surface.tick(&mut self.store)
            }
            ("region", [lon, lat, rest @ ..]) if rest.len() <= 1 => {
                let lon = parse_number(lon)?;
                let lat = parse_number(lat)?;
                let area = rest.first().map(|a| parse_number(a)).transpose()?;
                let region = RegionOfInterest::from_geometry(area, Centroid::new(lon, lat));
                self.store
                    .set_region_of_interest(Some(region))
                    .into_iter()
                    .collect()
            }
            ("clear-region", []) => self.store.clear_region().into_iter().collect(),
            ("reset", []) => self.store.reset().into_iter().collect(),
            ("show", []) => vec![self.store.snapshot_event()],
            ("query", []) => {
                let query = self.store.weather_query();
                let url = self.store.weather_url(&self.weather);
                return Ok(vec![json!({
                    "type": "WeatherQuery",
                    "query": query,
                    "url": url,
                    "at": self.clock.now(),
                })]);
            }
            _ => return Err(format!("unknown command '{line}' (expected one of: {USAGE})")),
        };

        events
            .iter()
            .map(|e| serde_json::to_value(e).map_err(|e| e.to_string()))
            .collect()
    }
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("invalid number '{text}'"))
}

fn parse_position(text: &str) -> Result<f64, String> {
    let pos = parse_number(text)?;
    if pos.is_nan() {
        return Err(format!("invalid position '{text}'"));
    }
    Ok(pos)
}

pub fn run(file: &Path, now: Option<DateTime<Utc>>) -> Result<(), Box<dyn std::error::Error>> {
    let source = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };

    let config = Config::load()?;
    let mut session = Session::new(&config, now.unwrap_or_else(Utc::now))?;
    for (index, line) in source.lines().enumerate() {
        let output = session
            .apply(line)
            .map_err(|e| format!("line {}: {e}", index + 1))?;
        for value in output {
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
