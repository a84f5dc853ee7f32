use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chat message within an event. `seq` is a per-event logical clock,
/// unique over (event_id, seq).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Message {
    pub id: String,
    pub event_id: String,
    pub sender: String,
    pub body: String,
    pub seq: i64,
    pub sent_at: DateTime<Utc>,
}

pub struct NewMessage {
    pub id: String,
    pub event_id: String,
    pub sender: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(event_id: String, sender: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            sender,
            body,
            sent_at: Utc::now(),
        }
    }
}
