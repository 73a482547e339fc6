use std::sync::Arc;

use super::*;
use crate::catalog::CatalogRecord;
use crate::embedding::MockEmbedder;
use crate::index::{index_units, IndexPoint, MockVectorIndex};
use crate::materialize::materialize;

fn unit_for(term: &str, explanation: &str) -> DocumentUnit {
    materialize(&CatalogRecord::Generic {
        term: term.to_string(),
        explanation: explanation.to_string(),
        example: String::new(),
        package: None,
    })
    .expect("unit")
}

async fn engine_with(
    embedder: MockEmbedder,
    index: MockVectorIndex,
    units: Vec<DocumentUnit>,
) -> RetrievalEngine {
    index_units(&embedder, &index, "units", &units)
        .await
        .expect("index");
    RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", units)
}

#[tokio::test]
async fn test_retrieve_orders_by_distance() {
    let holdout = unit_for("holdout", "Markets kept out of treatment.");
    let alpha = unit_for("alpha", "Significance level.");

    let embedder = MockEmbedder::new()
        .with_vector(holdout.text.clone(), vec![1.0, 0.0])
        .with_vector(alpha.text.clone(), vec![0.0, 1.0])
        .with_vector("what is a holdout?", vec![0.9, 0.1]);

    let engine = engine_with(embedder, MockVectorIndex::new(), vec![holdout, alpha]).await;

    let candidates = engine.retrieve("what is a holdout?", 5).await;

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].unit.metadata.name, "holdout");
    assert!(candidates[0].distance < candidates[1].distance);
}

#[tokio::test]
async fn test_retrieve_respects_k() {
    let units: Vec<DocumentUnit> = (0..6)
        .map(|i| unit_for(&format!("term{i}"), "Some explanation."))
        .collect();

    let engine = engine_with(MockEmbedder::new(), MockVectorIndex::new(), units).await;

    let candidates = engine.retrieve("term", 3).await;
    assert_eq!(candidates.len(), 3);
}

#[tokio::test]
async fn test_empty_index_returns_empty() {
    let engine = RetrievalEngine::new(
        Arc::new(MockEmbedder::new()),
        Arc::new(MockVectorIndex::new()),
        "units",
        Vec::new(),
    );

    assert!(engine.retrieve("anything", 5).await.is_empty());
}

#[tokio::test]
async fn test_embedding_failure_degrades_to_empty() {
    let unit = unit_for("holdout", "Markets kept out of treatment.");
    let index = MockVectorIndex::new();
    index.ensure_collection("units", 8).await.expect("create");

    let engine = RetrievalEngine::new(
        Arc::new(MockEmbedder::failing()),
        Arc::new(index),
        "units",
        vec![unit],
    );

    assert!(engine.retrieve("what is a holdout?", 5).await.is_empty());
}

#[tokio::test]
async fn test_search_failure_degrades_to_empty() {
    let unit = unit_for("holdout", "Markets kept out of treatment.");

    let engine = RetrievalEngine::new(
        Arc::new(MockEmbedder::new()),
        Arc::new(MockVectorIndex::failing()),
        "units",
        vec![unit],
    );

    assert!(engine.retrieve("what is a holdout?", 5).await.is_empty());
}

#[tokio::test]
async fn test_unknown_ids_are_skipped() {
    let unit = unit_for("holdout", "Markets kept out of treatment.");
    let embedder = MockEmbedder::new();
    let index = MockVectorIndex::new();

    index.ensure_collection("units", 8).await.expect("create");
    // A point whose id resolves to no unit (stale index entry).
    let stray = embedder.embed("stray").await.expect("embed");
    index
        .upsert("units", vec![IndexPoint::new(42, stray, "stale")])
        .await
        .expect("upsert");
    index_units(&embedder, &index, "units", std::slice::from_ref(&unit))
        .await
        .expect("index");

    let engine = RetrievalEngine::new(Arc::new(embedder), Arc::new(index), "units", vec![unit]);

    let candidates = engine.retrieve("holdout", 10).await;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].unit.metadata.name, "holdout");
}
