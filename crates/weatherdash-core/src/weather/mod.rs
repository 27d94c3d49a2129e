//! Contracts with the weather collaborator.
//!
//! The core never performs requests. It exposes the query key derived from
//! the selection, and consumes the hourly series the collaborator hands back
//! for display and playback.

mod playback;
mod query;
mod series;

pub use playback::{PlaybackEngine, PlaybackState};
pub use query::WeatherQuery;
pub use series::{CurrentReading, HourlySeries, SeriesPoint, TemperatureBand};
