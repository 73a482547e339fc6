//! Answer construction: knowledge formatting and generative synthesis.
//!
//! Two explicit entry points share one prompt builder: [`Synthesizer::synthesize`]
//! blocks for the full response, [`Synthesizer::synthesize_stream`] yields
//! chunks as they arrive. Extraction always happens on the fully collected
//! text; a caller that stops consuming the stream simply drops it, which
//! releases the underlying connection.

pub mod error;
pub mod format;
pub mod generator;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::GeneratorError;
pub use format::{format_answer, FormatterConfig, KnowledgeAnswer, NO_KNOWLEDGE_MESSAGE};
pub use generator::{GenaiGenerator, Generator};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerator;

use std::pin::Pin;
use std::sync::Arc;
use std::sync::LazyLock;
use std::task::{Context, Poll};

use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use regex::Regex;
use tracing::debug;

/// Delimiter the model is asked to wrap its final answer in.
pub const ANSWER_DELIMITER: &str = "---";

static DELIMITED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)---(.*?)---").expect("answer-block pattern is valid")
});

/// Builds the grounded instruction prompt.
///
/// The wording is load-bearing: the "I don't know." escape hatch and the
/// delimiter demand are what [`extract_answer`] and the router's
/// empty-answer handling rely on.
pub fn build_grounding_prompt(query: &str, context: &str) -> String {
    format!(
        r#"
You are a helpful assistant with statistical knowledge and expertise in advertisement.
Answer the query based on the given document.
If the document is irrelevant, respond with "I don't know."

Document: {context}

Query: {query}

You must provide exactly one answer in the following format.
---
<clear and concise answer, grounded only in the document>
---
"#
    )
}

/// Builds the ungrounded prompt for out-of-domain questions.
pub fn build_general_prompt(query: &str) -> String {
    format!(
        "You are an AI assistant helping with marketing experimentation and data analysis. \
         Please provide a helpful, concise answer to the following question. \
         Keep your response practical and actionable.\n\nQuestion: {query}"
    )
}

/// Extracts the final answer from raw model output.
///
/// Takes the content of the **last** `---`-delimited block; when the model
/// ignored the delimiter instruction (they do), the whole trimmed output is
/// used verbatim.
pub fn extract_answer(raw: &str) -> String {
    let last = DELIMITED_BLOCK
        .captures_iter(raw)
        .last()
        .map(|c| c[1].trim().to_string());

    match last {
        Some(block) => block,
        None => raw.trim().to_string(),
    }
}

/// Chunked generative output.
///
/// Yields text chunks in arrival order; dropping the stream cancels the
/// underlying request. [`AnswerStream::collect_answer`] drains the rest and
/// runs extraction on the concatenation.
pub struct AnswerStream {
    inner: BoxStream<'static, Result<String, GeneratorError>>,
}

impl AnswerStream {
    fn new(inner: BoxStream<'static, Result<String, GeneratorError>>) -> Self {
        Self { inner }
    }

    /// Drains remaining chunks and extracts the delimited answer.
    pub async fn collect_answer(mut self) -> Result<String, GeneratorError> {
        let mut raw = String::new();
        while let Some(chunk) = self.inner.next().await {
            raw.push_str(&chunk?);
        }
        Ok(extract_answer(&raw))
    }
}

impl Stream for AnswerStream {
    type Item = Result<String, GeneratorError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Generative answer construction over a [`Generator`] capability.
pub struct Synthesizer {
    generator: Arc<dyn Generator>,
    temperature: f64,
    max_tokens: u32,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn Generator>, temperature: f64, max_tokens: u32) -> Self {
        Self {
            generator,
            temperature,
            max_tokens,
        }
    }

    /// Grounded synthesis, blocking until the full answer is extracted.
    pub async fn synthesize(&self, query: &str, context: &str) -> Result<String, GeneratorError> {
        let prompt = build_grounding_prompt(query, context);

        debug!(
            prompt_len = prompt.len(),
            context_len = context.len(),
            "Invoking generator (blocking)"
        );

        let raw = self
            .generator
            .generate(&prompt, self.temperature, self.max_tokens)
            .await?;

        Ok(extract_answer(&raw))
    }

    /// Grounded synthesis as a chunk stream.
    pub async fn synthesize_stream(
        &self,
        query: &str,
        context: &str,
    ) -> Result<AnswerStream, GeneratorError> {
        let prompt = build_grounding_prompt(query, context);

        debug!(prompt_len = prompt.len(), "Invoking generator (streaming)");

        let stream = self
            .generator
            .generate_stream(&prompt, self.temperature, self.max_tokens)
            .await?;

        Ok(AnswerStream::new(stream))
    }

    /// Ungrounded answer for out-of-domain questions.
    pub async fn generate_general(&self, query: &str) -> Result<String, GeneratorError> {
        let prompt = build_general_prompt(query);
        let raw = self
            .generator
            .generate(&prompt, self.temperature, self.max_tokens)
            .await?;

        Ok(raw.trim().to_string())
    }
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
