//! The `ask` pipeline: retrieve → rerank → route → synthesize.
//!
//! All capabilities live in one explicitly-constructed pipeline value shared
//! behind `Arc` by concurrent requests; nothing here mutates shared state.
//! Capability failures never surface to the caller — they degrade the
//! routing signals and the decision table picks the next strategy. The only
//! error `ask` returns is a malformed (empty) query.

pub mod error;


pub use error::PipelineError;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::materialize::SectionKind;
use crate::rerank::{Reranker, ScoredCandidate};
use crate::retrieval::RetrievalEngine;
use crate::router::{ConfidenceRouter, RouteSignals, Strategy, FALLBACK_MESSAGE};
use crate::synthesis::{format_answer, FormatterConfig, Synthesizer};

/// Citation marker for answers produced without grounding.
pub const GENERATIVE_SOURCE: &str = "Generative model";

/// Citation marker appended when a knowledge answer was rephrased by the
/// generative capability.
pub const ENHANCED_SOURCE: &str = "Enhanced by generative model";

/// Disclaimer prefix for medium-confidence domain answers.
pub const DISCLAIMER_PREFIX: &str = "Based on my knowledge base:\n\n";

/// Grounded generation uses at most this many candidates as context.
pub const GROUNDING_CONTEXT_LIMIT: usize = 2;

/// The structured result of one `ask`.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Final answer text.
    pub answer: String,
    /// Citations, best match first.
    pub sources: Vec<String>,
    /// Which strategy produced the answer.
    pub method: Strategy,
    /// Calibrated confidence in `[0, 1]`.
    pub confidence: f32,
    /// Diagnostic fields for inspection; not part of the answer contract.
    pub debug_info: Map<String, Value>,
}

/// The query-answering pipeline.
pub struct Pipeline {
    engine: RetrievalEngine,
    reranker: Reranker,
    router: ConfidenceRouter,
    formatter: FormatterConfig,
    synthesizer: Option<Synthesizer>,
    retrieve_k: usize,
    top_n: usize,
}

impl Pipeline {
    pub fn new(
        engine: RetrievalEngine,
        reranker: Reranker,
        router: ConfidenceRouter,
        synthesizer: Option<Synthesizer>,
    ) -> Self {
        Self {
            engine,
            reranker,
            router,
            formatter: FormatterConfig::default(),
            synthesizer,
            retrieve_k: crate::rerank::DEFAULT_RETRIEVE_K,
            top_n: crate::rerank::DEFAULT_TOP_N,
        }
    }

    /// Overrides retrieval/rerank limits.
    pub fn with_limits(mut self, retrieve_k: usize, top_n: usize) -> Self {
        self.retrieve_k = retrieve_k;
        self.top_n = top_n;
        self
    }

    /// Overrides knowledge-formatting knobs.
    pub fn with_formatter(mut self, formatter: FormatterConfig) -> Self {
        self.formatter = formatter;
        self
    }

    /// Returns `true` if a generative capability is configured.
    pub fn generation_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Number of knowledge units behind the pipeline.
    pub fn unit_count(&self) -> usize {
        self.engine.unit_count()
    }

    /// Answers one query.
    ///
    /// Errors only on a blank query; every capability failure degrades to
    /// another strategy, down to the fixed fallback message.
    pub async fn ask(&self, query: &str) -> Result<Response, PipelineError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::EmptyQuery);
        }

        debug!(query = query, "Processing query");

        let candidates = self.engine.retrieve(query, self.retrieve_k).await;
        let best_distance = candidates.first().map(|c| c.distance);
        let total_candidates = candidates.len();

        let mut ranked = self.reranker.rerank_candidates(query, candidates).await;
        ranked.truncate(self.top_n);

        let mut signals = RouteSignals::new(
            query,
            total_candidates,
            best_distance,
            self.generation_available(),
        );

        // The decision table re-enters (at most twice) when a generative
        // call comes back empty; each pass disables the exhausted rule.
        loop {
            let decision = self.router.route(&signals);

            info!(
                strategy = %decision.strategy,
                confidence = decision.confidence,
                best_distance = ?best_distance,
                domain = signals.domain_relevance,
                "Routing decision"
            );

            match decision.strategy {
                Strategy::KnowledgeOnly => {
                    let formatted = format_answer(&ranked, &self.formatter);
                    return Ok(self.respond(
                        formatted.answer,
                        formatted.sources,
                        &decision,
                        &signals,
                        None,
                        total_candidates,
                    ));
                }

                Strategy::KnowledgeWithDisclaimer => {
                    let lookback = self
                        .router
                        .config()
                        .disclaimer_lookback_limit
                        .min(ranked.len());
                    let formatted = format_answer(&ranked[..lookback], &self.formatter);
                    return Ok(self.respond(
                        format!("{DISCLAIMER_PREFIX}{}", formatted.answer),
                        formatted.sources,
                        &decision,
                        &signals,
                        None,
                        total_candidates,
                    ));
                }

                Strategy::KnowledgePlusGeneration => {
                    let grounding = &ranked[..GROUNDING_CONTEXT_LIMIT.min(ranked.len())];
                    let context = build_grounding_context(grounding);

                    match self.try_synthesize(query, &context).await {
                        Some(answer) => {
                            let formatted = format_answer(&ranked, &self.formatter);
                            let mut sources = formatted.sources;
                            sources.push(ENHANCED_SOURCE.to_string());

                            return Ok(self.respond(
                                answer,
                                sources,
                                &decision,
                                &signals,
                                Some(grounding),
                                total_candidates,
                            ));
                        }
                        None => {
                            debug!("Grounded generation yielded nothing, re-routing");
                            signals.enhancement_failed = true;
                        }
                    }
                }

                Strategy::GenerationOnly => {
                    match self.try_generate_general(query).await {
                        Some(answer) => {
                            return Ok(self.respond(
                                answer,
                                vec![GENERATIVE_SOURCE.to_string()],
                                &decision,
                                &signals,
                                None,
                                total_candidates,
                            ));
                        }
                        None => {
                            debug!("Ungrounded generation yielded nothing, re-routing");
                            signals.generation_failed = true;
                        }
                    }
                }

                Strategy::Fallback => {
                    return Ok(self.respond(
                        FALLBACK_MESSAGE.to_string(),
                        Vec::new(),
                        &decision,
                        &signals,
                        None,
                        total_candidates,
                    ));
                }
            }
        }
    }

    /// Runs grounded synthesis, flattening errors and blank output to `None`.
    async fn try_synthesize(&self, query: &str, context: &str) -> Option<String> {
        let synthesizer = self.synthesizer.as_ref()?;

        match synthesizer.synthesize(query, context).await {
            Ok(answer) if !answer.is_empty() => Some(answer),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Grounded generation failed");
                None
            }
        }
    }

    /// Runs ungrounded generation, flattening errors and blank output to `None`.
    async fn try_generate_general(&self, query: &str) -> Option<String> {
        let synthesizer = self.synthesizer.as_ref()?;

        match synthesizer.generate_general(query).await {
            Ok(answer) if !answer.is_empty() => Some(answer),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ungrounded generation failed");
                None
            }
        }
    }

    fn respond(
        &self,
        answer: String,
        sources: Vec<String>,
        decision: &crate::router::Decision,
        signals: &RouteSignals,
        grounding: Option<&[ScoredCandidate]>,
        total_candidates: usize,
    ) -> Response {
        let mut debug_info = Map::new();
        debug_info.insert("decision_reason".to_string(), json!(decision.reason));
        debug_info.insert(
            "best_similarity_score".to_string(),
            json!(signals.best_distance),
        );
        debug_info.insert("raw_confidence".to_string(), json!(decision.raw_confidence));
        debug_info.insert(
            "enhancement_attempted".to_string(),
            json!(
                signals.enhancement_failed
                    || decision.strategy == Strategy::KnowledgePlusGeneration
            ),
        );
        debug_info.insert("domain_relevance".to_string(), json!(signals.domain_relevance));
        debug_info.insert("total_candidates".to_string(), json!(total_candidates));
        debug_info.insert(
            "answered_at".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        if let Some(grounding) = grounding {
            let documents: Vec<Value> = grounding
                .iter()
                .map(|s| {
                    json!({
                        "citation": s.candidate.unit.metadata.citation(),
                        "distance": s.candidate.distance,
                        "relevance": s.relevance,
                    })
                })
                .collect();
            debug_info.insert("grounding_documents".to_string(), json!(documents));
        }

        Response {
            answer,
            sources,
            method: decision.strategy,
            confidence: decision.confidence,
            debug_info,
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("unit_count", &self.engine.unit_count())
            .field("generation_available", &self.generation_available())
            .field("retrieve_k", &self.retrieve_k)
            .field("top_n", &self.top_n)
            .finish()
    }
}

/// Renders the grounding context handed to the generator.
fn build_grounding_context(grounding: &[ScoredCandidate]) -> String {
    let mut context = String::new();

    for scored in grounding {
        let metadata = &scored.candidate.unit.metadata;
        let text = &scored.candidate.unit.text;

        match metadata.section {
            SectionKind::Generic => {
                context.push_str(&format!("**{}**: {}\n\n", metadata.name, text));
            }
            SectionKind::Input | SectionKind::Output => {
                let function = metadata.function.as_deref().unwrap_or("unknown");
                context.push_str(&format!(
                    "**{}** (from {}): {}\n\n",
                    metadata.name, function, text
                ));
            }
        }
    }

    context
}
