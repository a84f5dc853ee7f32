use std::collections::HashMap;

use crate::domain::{models::visit::VisitRecord, ports::VisitRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteVisitRepo {
    pool: SqlitePool,
}

impl SqliteVisitRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[async_trait]
impl VisitRepository for SqliteVisitRepo {
    async fn increment(&self, place_id: &str, event_id: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO locations (place_id, event_id, visits) VALUES (?, ?, 1)
               ON CONFLICT (place_id, event_id) DO UPDATE SET visits = visits + 1"#,
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
        let sql = format!(
            "SELECT place_id, SUM(visits) FROM locations WHERE event_id IN ({}) GROUP BY place_id",
            placeholders(event_ids.len())
        );
        let mut query = sqlx::query_as::<_, (String, i64)>(&sql);
        for id in event_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(AppError::Database)?;
        Ok(rows.into_iter().collect())
    }

    async fn list_for(&self, event_ids: &[String], place_ids: &[String]) -> Result<Vec<VisitRecord>, AppError> {
        if event_ids.is_empty() || place_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT place_id, event_id, visits FROM locations WHERE event_id IN ({}) AND place_id IN ({})",
            placeholders(event_ids.len()),
            placeholders(place_ids.len())
        );
        let mut query = sqlx::query_as::<_, VisitRecord>(&sql);
        for id in event_ids {
            query = query.bind(id);
        }
        for id in place_ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
