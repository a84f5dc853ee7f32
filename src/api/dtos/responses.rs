use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

use crate::domain::models::point::Point;
use crate::domain::services::research::VisitMatrix;

#[derive(Serialize)]
pub struct RegisteredResponse {
    pub id: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub displayname: Option<String>,
}

/// Denormalized calendar fields; once stored, instants are exact.
#[derive(Serialize)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl From<DateTime<Utc>> for CalendarFields {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }
}

#[derive(Serialize)]
pub struct EventSearchItem {
    pub id: String,
    pub displayname: String,
    pub distance: Option<f64>,
    pub location: Option<Point>,
    pub start: Option<CalendarFields>,
    pub end: Option<CalendarFields>,
}

#[derive(Serialize)]
pub struct RecommendationItem {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Point,
    pub distance: f64,
}

#[derive(Serialize)]
pub struct CheckinResponse {
    pub place_id: String,
    pub place_name: Option<String>,
}

#[derive(Serialize)]
pub struct ResearchEventItem {
    pub id: String,
    pub displayname: String,
}

#[derive(Serialize)]
pub struct ResearchPlaceItem {
    pub id: String,
    pub name: Option<String>,
    pub coords: Point,
    pub types: Vec<String>,
}

#[derive(Serialize)]
pub struct ResearchResponse {
    pub events: Vec<ResearchEventItem>,
    pub places: Vec<ResearchPlaceItem>,
    pub visits: VisitMatrix,
}
