use crate::domain::ports::EmbeddingProvider;
use crate::domain::services::similarity;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

pub struct OpenAiEmbeddingProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingProvider {
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        let url = format!("{}/embeddings", self.base_url);
        let payload = json!({
            "model": self.model,
            "input": similarity::normalize_query(text),
        });

        let mut retries = 0;
        let mut backoff = INITIAL_BACKOFF_MS;

        loop {
            let res = self.client.post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await;

            match res {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: EmbeddingResponse = response.json().await.map_err(|e| {
                            error!("Failed to parse embedding response: {:?}", e);
                            AppError::Upstream("Malformed embedding response".to_string())
                        })?;
                        return body
                            .data
                            .into_iter()
                            .next()
                            .map(|d| d.embedding)
                            .ok_or_else(|| AppError::Upstream("No embedding in response".to_string()));
                    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                        if retries >= MAX_RETRIES {
                            error!("Embedding API failed after {} retries. Status: {}", retries, status);
                            let text = response.text().await.unwrap_or_default();
                            return Err(AppError::Upstream(format!("Embedding provider: {} - {}", status, text)));
                        }
                        warn!("Embedding API transient error {}. Retrying in {}ms...", status, backoff);
                        sleep(Duration::from_millis(backoff)).await;
                        retries += 1;
                        backoff *= 2;
                    } else {
                        let text = response.text().await.unwrap_or_default();
                        return Err(AppError::Upstream(format!("Embedding provider: {} - {}", status, text)));
                    }
                }
                Err(e) => {
                    if retries >= MAX_RETRIES {
                        error!("Embedding API unreachable after {} retries: {:?}", retries, e);
                        return Err(AppError::Upstream(format!("Embedding provider unreachable: {}", e)));
                    }
                    warn!("Embedding API connection error. Retrying in {}ms...", backoff);
                    sleep(Duration::from_millis(backoff)).await;
                    retries += 1;
                    backoff *= 2;
                }
            }
        }
    }
}
