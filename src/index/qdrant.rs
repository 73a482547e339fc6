use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};

use super::error::IndexError;
use super::model::{IndexHit, IndexPoint};
use super::VectorIndex;

#[derive(Clone)]
/// Qdrant-backed vector index.
///
/// Collections are created with Euclid distance so hit scores are plain
/// distances (lower = more similar), which is what the router's thresholds
/// expect.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl QdrantIndex {
    /// Creates a client for `url`.
    pub async fn new(url: &str) -> Result<Self, IndexError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| IndexError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), IndexError> {
        self.client
            .health_check()
            .await
            .map_err(|e| IndexError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), IndexError> {
        let exists = self.client.collection_exists(name).await.map_err(|e| {
            IndexError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            }
        })?;

        if exists {
            return Ok(());
        }

        let vectors_config = VectorParamsBuilder::new(vector_size, Distance::Euclid);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| IndexError::CreateCollectionFailed {
                collection: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), IndexError> {
        if points.is_empty() {
            return Ok(());
        }

        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|p| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("citation".to_string(), p.citation.into());

                PointStruct::new(p.id, p.vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await
            .map_err(|e| IndexError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn nearest(
        &self,
        collection: &str,
        query: Vec<f32>,
        k: u64,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let search_builder = SearchPointsBuilder::new(collection, query, k).with_payload(false);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| IndexError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        let hits = search_result
            .result
            .into_iter()
            .filter_map(IndexHit::from_scored_point)
            .collect();

        Ok(hits)
    }
}
