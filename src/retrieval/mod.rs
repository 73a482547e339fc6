//! Embedding retrieval over the materialized unit map.
//!
//! Retrieval is deliberately infallible: an unreachable index or a failed
//! embedding degrades to an empty candidate list (logged), which downstream
//! components treat as "no domain knowledge available". A query must never
//! die because the knowledge side is down.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::embedding::Embedder;
use crate::index::VectorIndex;
use crate::materialize::DocumentUnit;

/// A retrieved unit with its similarity distance (lower = more similar).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The retrieved unit.
    pub unit: DocumentUnit,
    /// Distance between query and unit embeddings.
    pub distance: f32,
}

/// Fetches the top-k candidate units for a query.
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
    units: Arc<HashMap<u64, DocumentUnit>>,
}

impl RetrievalEngine {
    /// Creates an engine over `units`, retrieving from `collection`.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
        units: Vec<DocumentUnit>,
    ) -> Self {
        let units: HashMap<u64, DocumentUnit> = units.into_iter().map(|u| (u.id, u)).collect();

        Self {
            embedder,
            index,
            collection: collection.into(),
            units: Arc::new(units),
        }
    }

    /// Number of units the engine can resolve hits against.
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Returns up to `k` candidates ordered by ascending distance.
    ///
    /// Capability errors are logged and converted to an empty result.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<Candidate> {
        if k == 0 || self.units.is_empty() {
            return Vec::new();
        }

        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Query embedding failed, returning no candidates");
                return Vec::new();
            }
        };

        let hits = match self
            .index
            .nearest(&self.collection, vector, k as u64)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Vector search failed, returning no candidates");
                return Vec::new();
            }
        };

        let mut candidates: Vec<Candidate> = hits
            .into_iter()
            .filter_map(|hit| match self.units.get(&hit.id) {
                Some(unit) => Some(Candidate {
                    unit: unit.clone(),
                    distance: hit.distance,
                }),
                None => {
                    debug!(id = hit.id, "Index hit has no unit, skipping");
                    None
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        candidates.truncate(k);
        candidates
    }
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("collection", &self.collection)
            .field("unit_count", &self.units.len())
            .finish()
    }
}
