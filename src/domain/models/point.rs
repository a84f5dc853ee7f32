use serde::{Deserialize, Serialize};

use crate::domain::services::geo;

/// A WGS84 coordinate pair. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    /// Builds a point, rejecting out-of-range coordinates.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }

    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Point::new(lat, lon),
            _ => None,
        }
    }

    /// Great-circle distance to another point, in miles.
    pub fn distance_miles(&self, other: &Point) -> f64 {
        geo::distance_miles(self, other)
    }
}
