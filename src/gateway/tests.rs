use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::*;
use crate::catalog::CatalogRecord;
use crate::embedding::MockEmbedder;
use crate::index::{index_units, MockVectorIndex};
use crate::materialize::materialize;
use crate::pipeline::Pipeline;
use crate::rerank::{MockRerankScorer, Reranker, RerankerConfig};
use crate::retrieval::RetrievalEngine;
use crate::router::ConfidenceRouter;

async fn test_router() -> Router {
    let unit = materialize(&CatalogRecord::Generic {
        term: "holdout".to_string(),
        explanation: "Markets kept out of treatment.".to_string(),
        example: String::new(),
        package: None,
    })
    .expect("unit");

    let embedder = MockEmbedder::new()
        .with_vector(unit.text.clone(), vec![0.0, 0.0])
        .with_vector("What is a holdout?", vec![0.3, 0.0]);
    let index = MockVectorIndex::new();
    let units = vec![unit];
    index_units(&embedder, &index, "units", &units)
        .await
        .expect("index");

    let engine = RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", units);
    let reranker = Reranker::new(Arc::new(MockRerankScorer::new()), RerankerConfig::default());
    let pipeline = Pipeline::new(engine, reranker, ConfidenceRouter::default(), None);

    create_router(AppState::new(Arc::new(pipeline)))
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn test_health_reports_components() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["knowledge_units"], 1);
    assert_eq!(body["generation_available"], false);
}

#[tokio::test]
async fn test_ask_answers_with_method_and_sources() {
    let app = test_router().await;

    let response = app
        .oneshot(ask_request(r#"{"query": "What is a holdout?"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

    assert_eq!(body["method"], "knowledge_only");
    assert_eq!(body["sources"][0], "Generic concept: holdout");
    assert!(body["answer"].as_str().expect("answer").contains("holdout"));
    assert!(body["debug_info"]["decision_reason"].is_string());
}

#[tokio::test]
async fn test_ask_rejects_blank_query() {
    let app = test_router().await;

    let response = app
        .oneshot(ask_request(r#"{"query": "   "}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

    assert_eq!(body["code"], 400);
}
