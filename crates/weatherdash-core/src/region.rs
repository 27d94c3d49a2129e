//! Region of interest handed over by the map-drawing collaborator.
//!
//! The core does not compute geometry. It only carries the centroid (which
//! keys weather queries) and the area the drawing tool reported.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub longitude: f64,
    pub latitude: f64,
}

impl Centroid {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Square metres, rounded to two decimals.
    pub area: Option<f64>,
    pub centroid: Option<Centroid>,
}

impl RegionOfInterest {
    /// Region for a polygon that was created or edited.
    pub fn from_geometry(area: Option<f64>, centroid: Centroid) -> Self {
        Self {
            area: area.map(round_area),
            centroid: Some(centroid),
        }
    }

    /// What the collaborator sends when the polygon is deleted.
    pub fn cleared() -> Self {
        Self {
            area: None,
            centroid: None,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.area.is_none() && self.centroid.is_none()
    }
}

fn round_area(area: f64) -> f64 {
    (area * 100.0).round() / 100.0
}
