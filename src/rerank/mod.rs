//! Cross-encoder relevance reranking.
//!
//! Each candidate is wrapped in a single structured prompt and judged by the
//! scoring capability as an affirmative/negative logit pair. The pair is
//! calibrated into a probability with a two-class log-softmax; using both
//! logits (rather than the affirmative one alone) is what makes scores
//! comparable across candidates and usable as routing thresholds.
//!
//! A scoring failure never drops candidates: the retrieval order is kept and
//! every candidate gets the neutral relevance from the config.

pub mod config;
pub mod error;
pub mod http;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use config::{RerankerConfig, DEFAULT_INSTRUCTION, DEFAULT_RETRIEVE_K, DEFAULT_TOP_N};
pub use error::RerankError;
pub use http::HttpRerankScorer;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRerankScorer;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::retrieval::{Candidate, RetrievalEngine};

/// Batch relevance-judgment capability.
///
/// Returns one `(affirmative_logit, negative_logit)` pair per prompt, in
/// prompt order.
#[async_trait]
pub trait RerankScorer: Send + Sync {
    async fn score_batch(&self, prompts: &[String]) -> Result<Vec<(f32, f32)>, RerankError>;
}

/// A candidate annotated with its calibrated relevance probability.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The retrieved candidate (distance and metadata preserved).
    pub candidate: Candidate,
    /// Calibrated relevance in `[0, 1]`.
    pub relevance: f32,
}

/// Scores and reorders retrieval candidates.
pub struct Reranker {
    scorer: Arc<dyn RerankScorer>,
    config: RerankerConfig,
}

impl Reranker {
    pub fn new(scorer: Arc<dyn RerankScorer>, config: RerankerConfig) -> Self {
        Self { scorer, config }
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }

    /// Scores `docs` against `query`, sorted non-increasing by relevance.
    ///
    /// Output length equals input length; ties keep input order (the sort is
    /// stable). An empty input returns empty without invoking the scorer.
    /// Each returned pair carries the doc's own score — pairing is
    /// positional, so duplicate texts are safe.
    pub async fn rerank(
        &self,
        query: &str,
        docs: &[String],
        instruction: Option<&str>,
    ) -> Vec<(String, f32)> {
        if docs.is_empty() {
            return Vec::new();
        }

        let relevances = self.score_texts(query, docs, instruction).await;

        let mut scored: Vec<(String, f32)> = docs
            .iter()
            .cloned()
            .zip(relevances)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(
            top_relevance = scored.first().map(|(_, r)| *r),
            num_docs = scored.len(),
            "Reranking complete"
        );

        scored
    }

    /// Retrieves `k` candidates and returns the `top_n` best by relevance.
    ///
    /// Relevance scores stay attached to their candidate by position
    /// throughout, so identical candidate texts never cross wires.
    pub async fn rerank_top(
        &self,
        engine: &RetrievalEngine,
        query: &str,
        k: usize,
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        let candidates = engine.retrieve(query, k).await;
        let mut scored = self.rerank_candidates(query, candidates).await;
        scored.truncate(top_n);
        scored
    }

    /// Scores already-retrieved candidates, sorted non-increasing by
    /// relevance (stable: ties keep retrieval order).
    pub async fn rerank_candidates(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
    ) -> Vec<ScoredCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let texts: Vec<String> = candidates.iter().map(|c| c.unit.text.clone()).collect();
        let relevances = self.score_texts(query, &texts, None).await;

        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .zip(relevances)
            .map(|(candidate, relevance)| ScoredCandidate {
                candidate,
                relevance,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored
    }

    /// Builds prompts, invokes the scorer, and calibrates the logit pairs.
    ///
    /// Returns one relevance per doc, in doc order. Failures (including a
    /// malformed batch length) degrade to the neutral relevance for every
    /// doc.
    async fn score_texts(&self, query: &str, docs: &[String], instruction: Option<&str>) -> Vec<f32> {
        let instruction = instruction.unwrap_or(&self.config.instruction);

        let prompts: Vec<String> = docs
            .iter()
            .map(|doc| build_prompt(instruction, query, doc))
            .collect();

        match self.scorer.score_batch(&prompts).await {
            Ok(logits) if logits.len() == docs.len() => {
                logits.into_iter().map(|(yes, no)| calibrate(yes, no)).collect()
            }
            Ok(logits) => {
                warn!(
                    expected = docs.len(),
                    actual = logits.len(),
                    neutral = self.config.neutral_relevance,
                    "Scorer returned a mismatched batch, using neutral relevance"
                );
                vec![self.config.neutral_relevance; docs.len()]
            }
            Err(e) => {
                warn!(
                    error = %e,
                    neutral = self.config.neutral_relevance,
                    "Rerank scoring failed, keeping retrieval order with neutral relevance"
                );
                vec![self.config.neutral_relevance; docs.len()]
            }
        }
    }
}

impl std::fmt::Debug for Reranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reranker")
            .field("config", &self.config)
            .finish()
    }
}

/// Builds the structured judgment prompt for one candidate.
pub fn build_prompt(instruction: &str, query: &str, doc: &str) -> String {
    format!("<Instruct>: {instruction}\n<Query>: {query}\n<Document>: {doc}")
}

/// Converts an affirmative/negative logit pair into the affirmative-class
/// probability via log-softmax over the two-way choice.
pub fn calibrate(affirmative: f32, negative: f32) -> f32 {
    let max = affirmative.max(negative);
    let yes = (affirmative - max).exp();
    let no = (negative - max).exp();
    yes / (yes + no)
}
