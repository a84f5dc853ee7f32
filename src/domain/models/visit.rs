use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregate counter of how often attendees of an event were observed at a
/// place. Composite key (place_id, event_id); only ever incremented.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VisitRecord {
    pub place_id: String,
    pub event_id: String,
    pub visits: i64,
}
