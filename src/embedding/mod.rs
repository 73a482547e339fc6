//! Query/document embedding capability.
//!
//! Model internals live in an external service; this module only defines the
//! [`Embedder`] seam and the HTTP adapter against an embedding endpoint
//! (text-embeddings-inference wire shape). Use [`MockEmbedder`] in tests.

pub mod error;
pub mod http;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::EmbeddingError;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

use async_trait::async_trait;

/// Text-to-vector capability.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds one text into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
