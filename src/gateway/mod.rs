//! HTTP gateway (Axum) for the ask pipeline.
//!
//! This module is primarily used by the `parlance` server binary. It exposes
//! exactly two routes: `POST /ask` and `GET /health`.

pub mod error;
pub mod payload;
pub mod state;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

pub use error::GatewayError;
pub use payload::{AskRequest, HealthResponse};
pub use state::AppState;

use crate::pipeline::{PipelineError, Response};

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ask", post(ask_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        knowledge_units: state.pipeline.unit_count(),
        generation_available: state.pipeline.generation_available(),
    })
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<Response>, GatewayError> {
    let request_id = Uuid::new_v4();

    info!(request_id = %request_id, query_len = request.query.len(), "Handling /ask");

    let response = state.pipeline.ask(&request.query).await.map_err(|e| {
        error!(request_id = %request_id, error = %e, "Query processing failed");
        match e {
            PipelineError::EmptyQuery => GatewayError::InvalidRequest(e.to_string()),
        }
    })?;

    info!(
        request_id = %request_id,
        method = %response.method,
        confidence = response.confidence,
        "Answered /ask"
    );

    Ok(Json(response))
}
