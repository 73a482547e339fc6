use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::Embedder;

/// In-memory embedder for tests.
///
/// Texts can be pinned to exact vectors with [`MockEmbedder::with_vector`];
/// anything else gets a deterministic vector derived from its bytes, so
/// identical texts always embed identically.
pub struct MockEmbedder {
    pinned: HashMap<String, Vec<f32>>,
    dim: usize,
    fail: bool,
    calls: Mutex<u64>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            pinned: HashMap::new(),
            dim: 8,
            fail: false,
            calls: Mutex::new(0),
        }
    }

    /// Pins `text` to embed as exactly `vector`.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.into(), vector);
        self
    }

    /// Makes every call fail, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Number of `embed` calls made so far.
    pub fn call_count(&self) -> u64 {
        *self.calls.lock()
    }

    fn derive(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dim] += f32::from(byte) / 255.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        *self.calls.lock() += 1;

        if self.fail {
            return Err(EmbeddingError::RequestFailed {
                url: "mock://embedder".to_string(),
                message: "mock failure".to_string(),
            });
        }

        if let Some(vector) = self.pinned.get(text) {
            return Ok(vector.clone());
        }

        Ok(self.derive(text))
    }
}
