use serde::{Deserialize, Serialize};

/// Body of `POST /ask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// Natural-language question.
    pub query: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Units the retrieval engine can resolve.
    pub knowledge_units: usize,
    /// Whether generative strategies are configured.
    pub generation_available: bool,
}
