use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent};
use genai::Client;
use tracing::error;

use super::error::GeneratorError;

/// Text generation capability (blocking and streaming).
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a full response for `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, GeneratorError>;

    /// Generates a response as a lazy chunk stream.
    async fn generate_stream(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<BoxStream<'static, Result<String, GeneratorError>>, GeneratorError>;
}

/// genai-backed generator. Provider and credentials are resolved by the
/// genai client from the model name and environment.
pub struct GenaiGenerator {
    client: Client,
    model: String,
}

impl GenaiGenerator {
    /// Creates a generator for `model` (e.g. `gemini-2.0-flash`).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Returns the configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn options(temperature: f64, max_tokens: u32) -> ChatOptions {
        ChatOptions::default()
            .with_temperature(temperature)
            .with_max_tokens(max_tokens)
    }
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Generator for GenaiGenerator {
    async fn generate(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, GeneratorError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = Self::options(temperature, max_tokens);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!("Provider error: {}", e);
                GeneratorError::Provider {
                    model: self.model.clone(),
                    message: e.to_string(),
                }
            })?;

        Ok(response.first_text().unwrap_or_default().to_string())
    }

    async fn generate_stream(
        &self,
        prompt: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<BoxStream<'static, Result<String, GeneratorError>>, GeneratorError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = Self::options(temperature, max_tokens);

        let stream_response = self
            .client
            .exec_chat_stream(&self.model, request, Some(&options))
            .await
            .map_err(|e| {
                error!("Provider stream init error: {}", e);
                GeneratorError::Provider {
                    model: self.model.clone(),
                    message: e.to_string(),
                }
            })?;

        let chunks = stream_response.stream.filter_map(|event| async move {
            match event {
                Ok(ChatStreamEvent::Chunk(chunk)) if !chunk.content.is_empty() => {
                    Some(Ok(chunk.content))
                }
                Ok(_) => None,
                Err(e) => Some(Err(GeneratorError::StreamInterrupted {
                    message: e.to_string(),
                })),
            }
        });

        Ok(chunks.boxed())
    }
}
