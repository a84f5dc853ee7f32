use std::collections::HashMap;

use crate::domain::{models::visit::VisitRecord, ports::VisitRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresVisitRepo {
    pool: PgPool,
}

impl PostgresVisitRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PostgresVisitRepo {
    async fn increment(&self, place_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO locations (place_id, event_id, visits) VALUES ($1, $2, 1)
               ON CONFLICT (place_id, event_id) DO UPDATE SET visits = locations.visits + 1"#,
        )
            .bind(place_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn sum_by_place(&self, event_ids: &[String]) -> Result<HashMap<String, i64>, AppError> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"SELECT place_id, SUM(visits)::BIGINT FROM locations
               WHERE event_id = ANY($1) GROUP BY place_id"#,
        )
            .bind(event_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(rows.into_iter().collect())
    }

    async fn list_for(&self, event_ids: &[String], place_ids: &[String]) -> Result<Vec<VisitRecord>, AppError> {
        if event_ids.is_empty() || place_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, VisitRecord>(
            r#"SELECT place_id, event_id, visits FROM locations
               WHERE event_id = ANY($1) AND place_id = ANY($2)"#,
        )
            .bind(event_ids)
            .bind(place_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
