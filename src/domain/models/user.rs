use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub displayname: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, email: String, displayname: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.to_lowercase(),
            password_hash,
            email: email.to_lowercase(),
            displayname,
            created_at: Utc::now(),
        }
    }
}
