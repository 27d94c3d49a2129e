use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::storage::WeatherConfig;
use crate::timeline::Selection;

/// What the weather collaborator keys its fetch and cache on.
///
/// Dates are the UTC calendar days of the selection's start and end; the
/// range is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeatherQuery {
    /// `None` until a region with a centroid has been drawn.
    pub fn from_selection(selection: &Selection) -> Option<Self> {
        let centroid = selection.region.as_ref()?.centroid?;
        Some(Self {
            latitude: centroid.latitude,
            longitude: centroid.longitude,
            start_date: selection.start.date_naive(),
            end_date: selection.end.date_naive(),
        })
    }

    pub fn archive_url(&self, config: &WeatherConfig) -> Result<Url> {
        let url = Url::parse_with_params(
            &config.archive_url,
            &[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
                ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
                ("hourly", config.hourly_variable.clone()),
            ],
        )?;
        Ok(url)
    }
}
