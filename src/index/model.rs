use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

/// One point to be stored in the index.
#[derive(Debug, Clone)]
pub struct IndexPoint {
    /// Stable unit id.
    pub id: u64,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Human-readable citation, kept in the payload for inspection.
    pub citation: String,
}

impl IndexPoint {
    pub fn new(id: u64, vector: Vec<f32>, citation: impl Into<String>) -> Self {
        Self {
            id,
            vector,
            citation: citation.into(),
        }
    }
}

/// One nearest-neighbor hit. `distance` is ascending-better (L2 semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    /// Stable unit id.
    pub id: u64,
    /// Distance from the query vector; lower = more similar.
    pub distance: f32,
}

impl IndexHit {
    /// Extracts a hit from a Qdrant scored point (numeric ids only).
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        Some(IndexHit {
            id,
            distance: point.score,
        })
    }
}
