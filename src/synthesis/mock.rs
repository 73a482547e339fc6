use async_trait::async_trait;
use futures_util::stream::BoxStream;
use parking_lot::Mutex;
use tokio_stream::StreamExt;

use super::error::GeneratorError;
use super::generator::Generator;

/// Scripted generator for tests.
///
/// Returns a fixed response; streaming mode yields it in small chunks so
/// chunk-accumulation behavior is actually exercised.
pub struct MockGenerator {
    response: String,
    chunk_size: usize,
    fail: bool,
    calls: Mutex<u64>,
}

impl MockGenerator {
    /// Always answers with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            chunk_size: 7,
            fail: false,
            calls: Mutex::new(0),
        }
    }

    /// Always answers with the empty string (the "model gave nothing" case).
    pub fn empty() -> Self {
        Self::with_response("")
    }

    /// Makes every call fail, for exercising degradation paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_response("")
        }
    }

    /// Overrides the streaming chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Number of generate/generate_stream calls made so far.
    pub fn call_count(&self) -> u64 {
        *self.calls.lock()
    }

    fn chunks(&self) -> Vec<String> {
        let chars: Vec<char> = self.response.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _temperature: f64,
        _max_tokens: u32,
    ) -> Result<String, GeneratorError> {
        *self.calls.lock() += 1;

        if self.fail {
            return Err(GeneratorError::Provider {
                model: "mock".to_string(),
                message: "mock failure".to_string(),
            });
        }

        Ok(self.response.clone())
    }

    async fn generate_stream(
        &self,
        _prompt: &str,
        _temperature: f64,
        _max_tokens: u32,
    ) -> Result<BoxStream<'static, Result<String, GeneratorError>>, GeneratorError> {
        *self.calls.lock() += 1;

        if self.fail {
            return Err(GeneratorError::Provider {
                model: "mock".to_string(),
                message: "mock failure".to_string(),
            });
        }

        let stream = tokio_stream::iter(self.chunks()).map(Ok);
        Ok(Box::pin(stream))
    }
}
