//! End-to-end pipeline tests over mock capabilities: catalog JSON on disk,
//! materialization, indexing, retrieval, reranking, routing, synthesis.

use std::io::Write;
use std::sync::Arc;

use futures_util::StreamExt;

use parlance::catalog::{Catalog, JsonCatalog};
use parlance::index::{index_units, MockVectorIndex};
use parlance::materialize::materialize_all;
use parlance::pipeline::{Pipeline, ENHANCED_SOURCE};
use parlance::rerank::{MockRerankScorer, Reranker, RerankerConfig};
use parlance::retrieval::RetrievalEngine;
use parlance::router::{ConfidenceRouter, Strategy};
use parlance::synthesis::{extract_answer, MockGenerator, Synthesizer};
use parlance::{Generator, MockEmbedder};

const CATALOG_JSON: &str = r#"[
    {
        "kind": "input",
        "function": "GeoLiftPower",
        "package": "GeoLift",
        "param": "lookback_window",
        "explanation": "Number of days into the past used for power calculations.",
        "example": "lookback_window = 7",
        "default_value": "1"
    },
    {
        "kind": "input",
        "function": "GeoLiftPower",
        "package": "GeoLift",
        "param": "alpha",
        "explanation": "Significance level for the power analysis.",
        "example": "alpha = 0.1"
    },
    {
        "kind": "output",
        "function": "GeoLift",
        "package": "GeoLift",
        "param": "att",
        "explanation": "Average treatment effect on the treated markets.",
        "importance": "high"
    },
    {
        "kind": "generic",
        "term": "holdout",
        "explanation": "Share of markets excluded from treatment during a test."
    },
    {
        "kind": "input",
        "function": "GeoLiftPower",
        "package": "GeoLift",
        "param": "internal_frame",
        "explanation": "Internal working data frame.",
        "omit": true
    }
]"#;

struct Harness {
    pipeline: Pipeline,
    generator: Arc<MockGenerator>,
}

/// Loads the catalog from a real temp file and wires every stage with mocks.
/// The query embeds at `query_distance` from the lookback_window unit; every
/// other unit sits much farther away.
async fn harness(query: &str, query_distance: f32, generator: MockGenerator) -> Harness {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(CATALOG_JSON.as_bytes()).expect("write");

    let catalog = JsonCatalog::new(file.path());
    let records = catalog.list_records().expect("catalog");
    let units = materialize_all(&records);
    assert_eq!(units.len(), 4, "omitted record must not materialize");

    let mut embedder = MockEmbedder::new().with_vector(query, vec![query_distance, 0.0]);
    for (i, unit) in units.iter().enumerate() {
        embedder = embedder.with_vector(unit.text.clone(), vec![0.0, i as f32 * 50.0]);
    }

    let index = MockVectorIndex::new();
    index_units(&embedder, &index, "units", &units)
        .await
        .expect("index");

    let engine = RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", units);
    let reranker = Reranker::new(
        Arc::new(MockRerankScorer::new().with_logits("lookback_window", (3.0, -3.0))),
        RerankerConfig::default(),
    );

    let generator = Arc::new(generator);
    let synthesizer = Synthesizer::new(
        generator.clone() as Arc<dyn Generator>,
        0.2,
        256,
    );

    let pipeline = Pipeline::new(
        engine,
        reranker,
        ConfidenceRouter::default(),
        Some(synthesizer),
    );

    Harness {
        pipeline,
        generator,
    }
}

#[tokio::test]
async fn excellent_match_is_served_from_the_catalog() {
    let query = "How should I set the lookback window?";
    let h = harness(query, 0.2, MockGenerator::with_response("unused")).await;

    let response = h.pipeline.ask(query).await.expect("response");

    assert_eq!(response.method, Strategy::KnowledgeOnly);
    assert!(response.answer.contains("lookback_window"));
    assert!(response
        .answer
        .contains("Number of days into the past used for power calculations."));
    assert_eq!(
        response.sources,
        vec!["GeoLift.GeoLiftPower.lookback_window"]
    );
    assert_eq!(h.generator.call_count(), 0);
}

#[tokio::test]
async fn good_match_is_enhanced_and_cited() {
    let query = "lookback window recommendation please";
    let h = harness(
        query,
        1.0,
        MockGenerator::with_response("---\nStart with 7 days of history.\n---"),
    )
    .await;

    let response = h.pipeline.ask(query).await.expect("response");

    assert_eq!(response.method, Strategy::KnowledgePlusGeneration);
    assert_eq!(response.answer, "Start with 7 days of history.");
    assert!(response.sources.contains(&ENHANCED_SOURCE.to_string()));
    assert!(response.confidence <= 0.9);
    assert_eq!(h.generator.call_count(), 1);

    let grounding = response
        .debug_info
        .get("grounding_documents")
        .and_then(|v| v.as_array())
        .expect("grounding documents");
    assert!(!grounding.is_empty());
    assert_eq!(
        grounding[0]["citation"],
        "GeoLift.GeoLiftPower.lookback_window"
    );
}

#[tokio::test]
async fn rerank_failure_keeps_the_request_alive() {
    let query = "How should I set the lookback window?";

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(CATALOG_JSON.as_bytes()).expect("write");
    let records = JsonCatalog::new(file.path()).list_records().expect("catalog");
    let units = materialize_all(&records);

    let mut embedder = MockEmbedder::new().with_vector(query, vec![0.2, 0.0]);
    for (i, unit) in units.iter().enumerate() {
        embedder = embedder.with_vector(unit.text.clone(), vec![0.0, i as f32 * 50.0]);
    }
    let index = MockVectorIndex::new();
    index_units(&embedder, &index, "units", &units)
        .await
        .expect("index");
    let engine = RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", units);

    // Scoring capability down: retrieval order carries the answer.
    let reranker = Reranker::new(
        Arc::new(MockRerankScorer::failing()),
        RerankerConfig::default(),
    );
    let pipeline = Pipeline::new(engine, reranker, ConfidenceRouter::default(), None);

    let response = pipeline.ask(query).await.expect("response");

    assert_eq!(response.method, Strategy::KnowledgeOnly);
    assert!(response.answer.contains("lookback_window"));
}

#[tokio::test]
async fn out_of_domain_query_uses_pure_generation() {
    let query = "who painted the ceiling of the sistine chapel";
    let h = harness(query, 1.6, MockGenerator::with_response("Michelangelo.")).await;

    let response = h.pipeline.ask(query).await.expect("response");

    assert_eq!(response.method, Strategy::GenerationOnly);
    assert_eq!(response.answer, "Michelangelo.");
    assert_eq!(response.confidence, 0.8);
}

#[tokio::test]
async fn streaming_chunks_reassemble_into_the_blocking_answer() {
    let raw = "Thinking it over.\n---\nStart with 7 days.\n---\n";
    let generator = Arc::new(MockGenerator::with_response(raw).with_chunk_size(5));
    let synthesizer = Synthesizer::new(generator as Arc<dyn Generator>, 0.2, 256);

    let mut stream = synthesizer
        .synthesize_stream("query", "context")
        .await
        .expect("stream");

    let mut collected = String::new();
    while let Some(chunk) = stream.next().await {
        collected.push_str(&chunk.expect("chunk"));
    }

    assert_eq!(collected, raw);
    assert_eq!(extract_answer(&collected), "Start with 7 days.");
}

#[tokio::test]
async fn embedding_failure_degrades_to_fallback() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(CATALOG_JSON.as_bytes()).expect("write");
    let records = JsonCatalog::new(file.path()).list_records().expect("catalog");
    let units = materialize_all(&records);

    let good_embedder = MockEmbedder::new();
    let index = MockVectorIndex::new();
    index_units(&good_embedder, &index, "units", &units)
        .await
        .expect("index");

    // The index is populated but query embedding is down.
    let engine = RetrievalEngine::new(
        Arc::new(MockEmbedder::failing()),
        Arc::new(index),
        "units",
        units,
    );
    let reranker = Reranker::new(Arc::new(MockRerankScorer::new()), RerankerConfig::default());
    let pipeline = Pipeline::new(engine, reranker, ConfidenceRouter::default(), None);

    let response = pipeline
        .ask("How should I set the lookback window?")
        .await
        .expect("response");

    assert_eq!(response.method, Strategy::Fallback);
    assert_eq!(response.confidence, 0.0);
}
