use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::IndexError;
use super::model::{IndexHit, IndexPoint};
use super::VectorIndex;

/// In-memory index for tests: exact Euclidean search over stored points.
#[derive(Default)]
pub struct MockVectorIndex {
    collections: RwLock<HashMap<String, MockCollection>>,
    fail_searches: bool,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, Vec<f32>>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every search fail, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            fail_searches: true,
            ..Self::default()
        }
    }

    /// Number of points stored in `collection`, if it exists.
    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.points.len())
    }
}

#[async_trait]
impl VectorIndex for MockVectorIndex {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), IndexError> {
        self.collections
            .write()
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: HashMap::new(),
            });

        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), IndexError> {
        let mut collections = self.collections.write();

        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| IndexError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        for point in points {
            if point.vector.len() as u64 != coll.vector_size {
                return Err(IndexError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: point.vector.len(),
                });
            }

            coll.points.insert(point.id, point.vector);
        }

        Ok(())
    }

    async fn nearest(
        &self,
        collection: &str,
        query: Vec<f32>,
        k: u64,
    ) -> Result<Vec<IndexHit>, IndexError> {
        if self.fail_searches {
            return Err(IndexError::SearchFailed {
                collection: collection.to_string(),
                message: "mock failure".to_string(),
            });
        }

        let collections = self.collections.read();

        let coll = collections
            .get(collection)
            .ok_or_else(|| IndexError::CollectionNotFound {
                collection: collection.to_string(),
            })?;

        let mut hits: Vec<IndexHit> = coll
            .points
            .iter()
            .map(|(&id, vector)| IndexHit {
                id,
                distance: euclidean_distance(&query, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        hits.truncate(k as usize);
        Ok(hits)
    }
}

/// Plain Euclidean distance; mismatched lengths count as maximally distant.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nearest_orders_by_ascending_distance() {
        let index = MockVectorIndex::new();
        index.ensure_collection("units", 2).await.expect("create");
        index
            .upsert(
                "units",
                vec![
                    IndexPoint::new(1, vec![0.0, 0.0], "a"),
                    IndexPoint::new(2, vec![1.0, 0.0], "b"),
                    IndexPoint::new(3, vec![5.0, 5.0], "c"),
                ],
            )
            .await
            .expect("upsert");

        let hits = index
            .nearest("units", vec![0.1, 0.0], 10)
            .await
            .expect("search");

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[1].id, 2);
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[tokio::test]
    async fn test_nearest_respects_k() {
        let index = MockVectorIndex::new();
        index.ensure_collection("units", 1).await.expect("create");
        index
            .upsert(
                "units",
                (0..10)
                    .map(|i| IndexPoint::new(i, vec![i as f32], format!("p{i}")))
                    .collect(),
            )
            .await
            .expect("upsert");

        let hits = index.nearest("units", vec![0.0], 3).await.expect("search");
        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_rejects_wrong_dimension() {
        let index = MockVectorIndex::new();
        index.ensure_collection("units", 2).await.expect("create");

        let result = index
            .upsert("units", vec![IndexPoint::new(1, vec![1.0], "bad")])
            .await;

        assert!(matches!(result, Err(IndexError::InvalidDimension { .. })));
    }
}
