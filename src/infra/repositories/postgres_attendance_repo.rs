use crate::domain::ports::AttendanceRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAttendanceRepo {
    pool: PgPool,
}

impl PostgresAttendanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepo {
    async fn add(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO attendees (user_id, event_id) VALUES ($1, $2)
               ON CONFLICT (user_id, event_id) DO NOTHING"#,
        )
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn remove(&self, user_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM attendees WHERE user_id = $1 AND event_id = $2")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn is_attendee(&self, user_id: &str, event_id: &str) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendees WHERE user_id = $1 AND event_id = $2",
        )
            .bind(user_id)
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count > 0)
    }

    async fn event_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT event_id FROM attendees WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
