use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub embedding_api_url: String,
    pub embedding_api_key: String,
    pub embedding_model: String,
    pub places_api_url: String,
    pub places_api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            embedding_api_url: env::var("EMBEDDING_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            embedding_api_key: env::var("EMBEDDING_API_KEY").expect("EMBEDDING_API_KEY must be set"),
            embedding_model: env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            places_api_url: env::var("PLACES_API_URL").unwrap_or_else(|_| "https://places.googleapis.com/v1".to_string()),
            places_api_key: env::var("PLACES_API_KEY").expect("PLACES_API_KEY must be set"),
        }
    }
}
