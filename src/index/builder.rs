//! Builds the vector index from materialized units.

use tracing::{info, warn};

use crate::embedding::Embedder;
use crate::materialize::DocumentUnit;

use super::error::IndexError;
use super::model::IndexPoint;
use super::VectorIndex;

/// Embeds every unit and upserts it into `collection`.
///
/// The collection is created (if missing) with the dimensionality of the
/// first embedding. Units whose embedding fails are skipped with a warning
/// rather than aborting the build. Returns the number of units indexed.
pub async fn index_units(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    collection: &str,
    units: &[DocumentUnit],
) -> Result<usize, IndexError> {
    if units.is_empty() {
        info!(collection = collection, "No units to index");
        return Ok(0);
    }

    let mut points = Vec::with_capacity(units.len());

    for unit in units {
        match embedder.embed(&unit.text).await {
            Ok(vector) => {
                points.push(IndexPoint::new(unit.id, vector, unit.metadata.citation()));
            }
            Err(e) => {
                warn!(
                    unit = %unit.metadata.citation(),
                    error = %e,
                    "Skipping unit, embedding failed"
                );
            }
        }
    }

    let Some(first) = points.first() else {
        warn!(
            collection = collection,
            total = units.len(),
            "No unit could be embedded, index left untouched"
        );
        return Ok(0);
    };

    index
        .ensure_collection(collection, first.vector.len() as u64)
        .await?;

    let indexed = points.len();
    index.upsert(collection, points).await?;

    info!(
        collection = collection,
        indexed = indexed,
        total = units.len(),
        "Indexed materialized units"
    );

    Ok(indexed)
}
