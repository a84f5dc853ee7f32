use crate::domain::{
    models::place::{Place, PlaceCandidate},
    ports::PlaceRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPlaceRepo {
    pool: PgPool,
}

impl PostgresPlaceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for PostgresPlaceRepo {
    async fn upsert(&self, candidate: &PlaceCandidate) -> Result<(), AppError> {
        sqlx::query(
            r#"INSERT INTO places (id, name, address, lat, lon)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (id) DO NOTHING"#,
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
            sqlx::query(
                r#"INSERT INTO placetypes (place_id, type) VALUES ($1, $2)
                   ON CONFLICT (place_id, type) DO NOTHING"#,
            )
                .bind(&candidate.id)
                .bind(t)
                .execute(&self.pool)
                .await
                .map_err(AppError::Database)?;
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Place>, AppError> {
        sqlx::query_as::<_, Place>("SELECT * FROM places WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn backfill_name(&self, id: &str, name: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE places SET name = $1 WHERE id = $2 AND name IS NULL")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_types(&self, place_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>("SELECT type FROM placetypes WHERE place_id = $1 ORDER BY type")
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
        sqlx::query_as::<_, Place>(
            r#"SELECT DISTINCT places.* FROM locations
               JOIN places ON locations.place_id = places.id
               WHERE locations.event_id = ANY($1)
               ORDER BY places.id"#,
        )
            .bind(event_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
