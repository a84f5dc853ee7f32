use crate::domain::{
    models::place::{Place, PlaceCandidate},
    ports::PlaceRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePlaceRepo {
    pool: SqlitePool,
}

impl SqlitePlaceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[async_trait]
impl PlaceRepository for SqlitePlaceRepo {
    async fn upsert(&self, candidate: &PlaceCandidate) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT OR IGNORE INTO places (id, name, address, lat, lon)
               VALUES (?, ?, ?, ?, ?)"#,
        )
            .bind(&candidate.id)
            .bind(&candidate.name)
            .bind(&candidate.address)
            .bind(candidate.coords.lat)
            .bind(candidate.coords.lon)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        for t in &candidate.types {
            sqlx::query("INSERT OR IGNORE INTO placetypes (place_id, type) VALUES (?, ?)")
                .bind(&candidate.id)
                .bind(t)
                .execute(&self.pool)
                .await
                .map_err(AppError::Database)?;
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Place>, AppError> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn backfill_name(&self, id: &str, name: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE places SET name = ? WHERE id = ? AND name IS NULL")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_types(&self, place_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT type FROM placetypes WHERE place_id = ? ORDER BY type")
            .bind(place_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn distinct_types(&self) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT DISTINCT type FROM placetypes ORDER BY type")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_visited_by_events(&self, event_ids: &[String]) -> Result<Vec<Place>, AppError> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            r#"SELECT DISTINCT places.* FROM locations
               JOIN places ON locations.place_id = places.id
               WHERE locations.event_id IN ({})
               ORDER BY places.id"#,
            placeholders(event_ids.len())
        );
        let mut query = sqlx::query_as::<_, Place>(&sql);
        for id in event_ids {
            query = query.bind(id);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
