use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::models::point::Point;

/// A point of interest cached from the places provider. The provider's
/// identifier is the primary key; rows are never deleted and stored fields are
/// never overwritten once known.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Place {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Place {
    pub fn coords(&self) -> Point {
        Point { lat: self.lat, lon: self.lon }
    }
}

/// A place as returned by the external provider, before it is persisted.
#[derive(Debug, Clone)]
pub struct PlaceCandidate {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub coords: Point,
    pub types: Vec<String>,
}
