//! Vector index capability (Qdrant-backed).
//!
//! The index stores one point per materialized unit, keyed by the unit's
//! stable id. Scores are distances: lower means more similar, matching the
//! L2 semantics the rest of the pipeline (thresholds, confidence map) is
//! calibrated against.

pub mod builder;
pub mod error;
pub mod model;
pub mod qdrant;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use builder::index_units;
pub use error::IndexError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorIndex;
pub use model::{IndexHit, IndexPoint};
pub use qdrant::QdrantIndex;

use async_trait::async_trait;

/// Default collection holding the materialized units.
pub const DEFAULT_COLLECTION_NAME: &str = "parlance_units";

/// Nearest-neighbor lookup capability.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Ensures a collection exists (creates it if missing).
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), IndexError>;

    /// Upserts points into a collection.
    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), IndexError>;

    /// Returns up to `k` hits ordered by ascending distance.
    async fn nearest(
        &self,
        collection: &str,
        query: Vec<f32>,
        k: u64,
    ) -> Result<Vec<IndexHit>, IndexError>;
}
