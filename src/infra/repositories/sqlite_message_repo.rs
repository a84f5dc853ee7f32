use crate::domain::{
    models::message::{Message, NewMessage},
    ports::MessageRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMessageRepo {
    pool: SqlitePool,
}

impl SqliteMessageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for SqliteMessageRepo {
    async fn append(&self, message: &NewMessage) -> Result<Message, AppError> {
        // The subselect assigns the next logical-clock value in the same
        // statement; the (event_id, seq) unique index catches racing writers.
        sqlx::query_as::<_, Message>(
            r#"INSERT INTO messages (id, event_id, sender, body, seq, sent_at)
               SELECT ?1, ?2, ?3, ?4, COALESCE(MAX(seq), 0) + 1, ?5
               FROM messages WHERE event_id = ?2
               RETURNING *"#,
        )
            .bind(&message.id)
            .bind(&message.event_id)
            .bind(&message.sender)
            .bind(&message.body)
            .bind(message.sent_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Message>, AppError> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE event_id = ? ORDER BY seq")
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
