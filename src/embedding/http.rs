use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::EmbeddingError;
use super::Embedder;

/// HTTP adapter for a text-embeddings-inference-compatible service.
///
/// Sends `POST {base_url}/embed` with `{"inputs": [text]}` and expects a
/// batch of vectors back, one per input.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EmbedResponse {
    Batch(Vec<Vec<f32>>),
    Single(Vec<f32>),
}

impl HttpEmbedder {
    /// Creates an embedder for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the configured service URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/embed", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = self.endpoint();

        debug!(url = %url, text_len = text.len(), "Requesting embedding");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "inputs": [text] }))
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| EmbeddingError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let body: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let vector = match body {
            EmbedResponse::Batch(mut batch) => {
                if batch.is_empty() {
                    return Err(EmbeddingError::EmptyResult);
                }
                batch.swap_remove(0)
            }
            EmbedResponse::Single(vector) => vector,
        };

        if vector.is_empty() {
            return Err(EmbeddingError::EmptyResult);
        }

        Ok(vector)
    }
}
