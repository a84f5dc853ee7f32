use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::models::point::Point;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub displayname: String,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub host: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Derived from displayname + description; kept in sync on every mutation
    /// of either field.
    #[serde(skip_serializing)]
    pub embedding: Option<Json<Vec<f32>>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewEventParams {
    pub displayname: String,
    pub description: Option<String>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub host: String,
    pub coords: Option<Point>,
    pub embedding: Option<Vec<f32>>,
}

impl Event {
    pub fn new(params: NewEventParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            displayname: params.displayname,
            description: params.description,
            start_at: params.start_at,
            end_at: params.end_at,
            host: params.host,
            lat: params.coords.map(|p| p.lat),
            lon: params.coords.map(|p| p.lon),
            embedding: params.embedding.map(Json),
            created_at: Utc::now(),
        }
    }

    pub fn coords(&self) -> Option<Point> {
        Point::from_parts(self.lat, self.lon)
    }

    /// The text the embedding is derived from.
    pub fn embedding_text(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!("{} {}", self.displayname, desc),
            _ => self.displayname.clone(),
        }
    }
}
