use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::error::RerankError;
use super::RerankScorer;

/// HTTP adapter for a two-logit rerank scoring service.
///
/// Sends `POST {base_url}/score` with `{"inputs": [prompt, ...]}` and
/// expects one `[affirmative, negative]` logit pair per prompt, in order.
#[derive(Debug, Clone)]
pub struct HttpRerankScorer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ScoreResponse {
    logits: Vec<[f32; 2]>,
}

impl HttpRerankScorer {
    /// Creates a scorer for the service at `base_url`.
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
        format!("{}/score", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RerankScorer for HttpRerankScorer {
    async fn score_batch(&self, prompts: &[String]) -> Result<Vec<(f32, f32)>, RerankError> {
        let url = self.endpoint();

        debug!(url = %url, batch = prompts.len(), "Requesting rerank scores");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "inputs": prompts }))
            .send()
            .await
            .map_err(|e| RerankError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let response = response
            .error_for_status()
            .map_err(|e| RerankError::RequestFailed {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let body: ScoreResponse =
            response
                .json()
                .await
                .map_err(|e| RerankError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        Ok(body.logits.into_iter().map(|[yes, no]| (yes, no)).collect())
    }
}
