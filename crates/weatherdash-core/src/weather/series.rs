//! Hourly series handed back by the weather collaborator.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};
use crate::timeline::{Selection, SelectionMode, TimeInstant};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct Payload {
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<String>,
    #[serde(flatten)]
    variables: HashMap<String, Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: TimeInstant,
    pub value: f64,
}

/// Readings for the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurrentReading<'a> {
    /// Single mode: the reading within an hour of the selected instant.
    Point(Option<&'a SeriesPoint>),
    /// Range mode: every reading inside `[start, end]`.
    Range(&'a [SeriesPoint]),
}

/// Time-ordered readings, nulls removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    pub variable: String,
    points: Vec<SeriesPoint>,
}

impl HourlySeries {
    /// Decode a payload of the form
    /// `{"hourly": {"time": [...], "<variable>": [...]}}`.
    ///
    /// Timestamps are UTC `YYYY-MM-DDTHH:MM`. Null readings and timestamps
    /// that do not parse are dropped.
    pub fn from_json(json: &str, variable: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(json)?;
        let mut hourly = payload.hourly.ok_or(SeriesError::MissingHourly)?;
        let values = hourly
            .variables
            .remove(variable)
            .ok_or_else(|| SeriesError::MissingVariable(variable.to_string()))?;
        if values.len() != hourly.time.len() {
            return Err(SeriesError::LengthMismatch {
                times: hourly.time.len(),
                values: values.len(),
            }
            .into());
        }

        let mut unparsable = 0usize;
        let mut points: Vec<SeriesPoint> = hourly
            .time
            .iter()
            .zip(values)
            .filter_map(|(raw, value)| {
                let value = value?;
                match NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
                    Ok(t) => Some(SeriesPoint {
                        time: t.and_utc(),
                        value,
                    }),
                    Err(_) => {
                        unparsable += 1;
                        None
                    }
                }
            })
            .collect();
        if unparsable > 0 {
            tracing::warn!(unparsable, variable, "dropped series entries with bad timestamps");
        }
        points.sort_by_key(|p| p.time);

        Ok(Self {
            variable: variable.to_string(),
            points,
        })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SeriesPoint> {
        self.points.get(index)
    }

    pub fn current(&self, selection: &Selection) -> CurrentReading<'_> {
        match selection.mode {
            SelectionMode::Single => {
                let hour = Duration::hours(1);
                CurrentReading::Point(
                    self.points
                        .iter()
                        .find(|p| (p.time - selection.start).abs() < hour),
                )
            }
            SelectionMode::Range => {
                let from = self.points.partition_point(|p| p.time < selection.start);
                let to = self.points.partition_point(|p| p.time <= selection.end);
                CurrentReading::Range(&self.points[from..to.max(from)])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Cold,
    Mild,
    Hot,
}

impl TemperatureBand {
    /// Below 10 °C is cold, above 30 °C hot.
    pub fn classify(celsius: f64) -> Self {
        if celsius < 10.0 {
            Self::Cold
        } else if celsius <= 30.0 {
            Self::Mild
        } else {
            Self::Hot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use chrono::{TimeZone, Utc};

    const PAYLOAD: &str = r#"{
        "latitude": 28.6,
        "hourly": {
            "time": ["2024-12-15T00:00", "2024-12-15T01:00", "2024-12-15T02:00", "garbage", "2024-12-15T04:00"],
            "temperature_2m": [8.5, null, 12.0, 13.0, 31.5]
        }
    }"#;

    fn at(h: u32, m: u32) -> TimeInstant {
        Utc.with_ymd_and_hms(2024, 12, 15, h, m, 0).unwrap()
    }

    #[test]
    fn drops_nulls_and_bad_timestamps() {
        let series = HourlySeries::from_json(PAYLOAD, "temperature_2m").unwrap();
        let values: Vec<f64> = series.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![8.5, 12.0, 31.5]);
        assert_eq!(series.get(1).unwrap().time, at(2, 0));
    }

    #[test]
    fn rejects_missing_blocks_and_mismatched_lengths() {
        assert!(matches!(
            HourlySeries::from_json(r#"{"latitude": 1.0}"#, "temperature_2m"),
            Err(CoreError::Series(SeriesError::MissingHourly))
        ));
        assert!(matches!(
            HourlySeries::from_json(PAYLOAD, "precipitation"),
            Err(CoreError::Series(SeriesError::MissingVariable(_)))
        ));
        let short = r#"{"hourly": {"time": ["2024-12-15T00:00"], "temperature_2m": []}}"#;
        assert!(matches!(
            HourlySeries::from_json(short, "temperature_2m"),
            Err(CoreError::Series(SeriesError::LengthMismatch { times: 1, values: 0 }))
        ));
    }

    #[test]
    fn single_mode_reads_point_within_an_hour() {
        let series = HourlySeries::from_json(PAYLOAD, "temperature_2m").unwrap();
        let mut selection = Selection {
            mode: SelectionMode::Single,
            start: at(1, 30),
            end: at(23, 0),
            region: None,
        };
        assert_eq!(
            series.current(&selection),
            CurrentReading::Point(series.get(1))
        );

        selection.start = at(3, 0);
        assert_eq!(series.current(&selection), CurrentReading::Point(None));
    }

    #[test]
    fn range_mode_reads_inclusive_window() {
        let series = HourlySeries::from_json(PAYLOAD, "temperature_2m").unwrap();
        let selection = Selection {
            mode: SelectionMode::Range,
            start: at(0, 0),
            end: at(2, 0),
            region: None,
        };
        let CurrentReading::Range(points) = series.current(&selection) else {
            panic!("expected range reading");
        };
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn bands_match_thresholds() {
        assert_eq!(TemperatureBand::classify(9.9), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::classify(10.0), TemperatureBand::Mild);
        assert_eq!(TemperatureBand::classify(30.0), TemperatureBand::Mild);
        assert_eq!(TemperatureBand::classify(30.1), TemperatureBand::Hot);
    }
}
