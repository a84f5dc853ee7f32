use meetpoint_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{place::PlaceCandidate, point::Point},
    domain::ports::{EmbeddingProvider, PlacesProvider},
    error::AppError,
    infra::repositories::{
        sqlite_attendance_repo::SqliteAttendanceRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_message_repo::SqliteMessageRepo,
        sqlite_place_repo::SqlitePlaceRepo,
        sqlite_user_repo::SqliteUserRepo,
        sqlite_visit_repo::SqliteVisitRepo,
    },
    state::AppState,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Deterministic embeddings over a tiny fixed vocabulary. Each known word is
/// its own axis, so identical keyword sets have cosine 1.0 and disjoint ones
/// 0.0; everything else lands in a shared catch-all axis.
pub struct MockEmbeddingProvider;

const VOCAB: [&str; 6] = ["jazz", "picnic", "yoga", "chess", "food", "music"];

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let mut vector = vec![0.0f32; VOCAB.len() + 1];
        for word in text.to_lowercase().split_whitespace() {
            match VOCAB.iter().position(|v| *v == word) {
                Some(i) => vector[i] += 1.0,
                None => vector[VOCAB.len()] += 1.0,
            }
        }
        Ok(vector)
    }
}

/// Canned provider responses, set per test.
#[derive(Default)]
pub struct MockPlacesProvider {
    pub search_results: Vec<PlaceCandidate>,
    pub geocode_results: Vec<PlaceCandidate>,
    pub details: Vec<PlaceCandidate>,
}

#[async_trait]
impl PlacesProvider for MockPlacesProvider {
    async fn text_search(
        &self,
        _query: &str,
        _bias: &Point,
        _radius_meters: f64,
    ) -> Result<Vec<PlaceCandidate>, AppError> {
        Ok(self.search_results.clone())
    }

    async fn reverse_geocode(&self, _point: &Point) -> Result<Vec<PlaceCandidate>, AppError> {
        Ok(self.geocode_results.clone())
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceCandidate>, AppError> {
        Ok(self.details.iter().find(|p| p.id == place_id).cloned())
    }
}

#[allow(dead_code)]
pub fn candidate(id: &str, name: Option<&str>, lat: f64, lon: f64, types: &[&str]) -> PlaceCandidate {
    PlaceCandidate {
        id: id.to_string(),
        name: name.map(String::from),
        address: Some(format!("{} street", id)),
        coords: Point { lat, lon },
        types: types.iter().map(|t| t.to_string()).collect(),
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_places(MockPlacesProvider::default()).await
    }

    pub async fn with_places(places: MockPlacesProvider) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            embedding_api_url: "http://localhost".to_string(),
            embedding_api_key: "test-key".to_string(),
            embedding_model: "test-model".to_string(),
            places_api_url: "http://localhost".to_string(),
            places_api_key: "test-key".to_string(),
        };

        let state = Arc::new(AppState {
            config,
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            place_repo: Arc::new(SqlitePlaceRepo::new(pool.clone())),
            visit_repo: Arc::new(SqliteVisitRepo::new(pool.clone())),
            attendance_repo: Arc::new(SqliteAttendanceRepo::new(pool.clone())),
            message_repo: Arc::new(SqliteMessageRepo::new(pool.clone())),
            embedding_provider: Arc::new(MockEmbeddingProvider),
            places_provider: Arc::new(places),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Registers a user and returns their id together with the ready-made
    /// Authorization header value.
    pub async fn register(&self, username: &str, password: &str) -> (String, String) {
        let payload = json!({
            "username": username,
            "password": password,
            "email": format!("{}@example.com", username),
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Registration failed in test helper: status {}", response.status());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let id = body["id"].as_str().expect("No id in registration body").to_string();

        (id, basic_auth(username, password))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{}:{}", username, password)))
}
