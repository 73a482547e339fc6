//! HTTP surface tests against the public router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use parlance::gateway::{create_router, AppState};
use parlance::index::{index_units, MockVectorIndex};
use parlance::materialize::materialize_all;
use parlance::pipeline::Pipeline;
use parlance::rerank::{MockRerankScorer, Reranker, RerankerConfig};
use parlance::retrieval::RetrievalEngine;
use parlance::router::ConfidenceRouter;
use parlance::synthesis::Synthesizer;
use parlance::{CatalogRecord, Generator, MockEmbedder, MockGenerator};

async fn test_app() -> axum::Router {
    let records = vec![
        CatalogRecord::Generic {
            term: "holdout".to_string(),
            explanation: "Share of markets excluded from treatment.".to_string(),
            example: String::new(),
            package: None,
        },
        CatalogRecord::Generic {
            term: "mde".to_string(),
            explanation: "Minimum detectable effect of the experiment.".to_string(),
            example: String::new(),
            package: None,
        },
    ];
    let units = materialize_all(&records);

    let mut embedder = MockEmbedder::new().with_vector("What is a holdout?", vec![0.3, 0.0]);
    for (i, unit) in units.iter().enumerate() {
        embedder = embedder.with_vector(unit.text.clone(), vec![0.0, i as f32 * 40.0]);
    }

    let index = MockVectorIndex::new();
    index_units(&embedder, &index, "units", &units)
        .await
        .expect("index");

    let engine = RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", units);
    let reranker = Reranker::new(Arc::new(MockRerankScorer::new()), RerankerConfig::default());
    let generator = Arc::new(MockGenerator::with_response("---\nAn answer.\n---"));
    let synthesizer = Synthesizer::new(generator as Arc<dyn Generator>, 0.2, 256);

    let pipeline = Pipeline::new(
        engine,
        reranker,
        ConfidenceRouter::default(),
        Some(synthesizer),
    );

    create_router(AppState::new(Arc::new(pipeline)))
}

fn post_ask(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/ask")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reflects_wiring() {
    let app = test_app().await;

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
    assert_eq!(body["knowledge_units"], 2);
    assert_eq!(body["generation_available"], true);
}

#[tokio::test]
async fn ask_returns_a_structured_response() {
    let app = test_app().await;

    let response = app
        .oneshot(post_ask(r#"{"query": "What is a holdout?"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");

    assert_eq!(body["method"], "knowledge_only");
    assert!(body["confidence"].as_f64().expect("confidence") > 0.8);
    assert_eq!(body["sources"][0], "Generic concept: holdout");
    assert!(body["debug_info"]["best_similarity_score"].is_number());
}

#[tokio::test]
async fn blank_query_is_a_bad_request() {
    let app = test_app().await;

    let response = app
        .oneshot(post_ask(r#"{"query": ""}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = test_app().await;

    let response = app
        .oneshot(post_ask(r#"{"not_query": 1}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
