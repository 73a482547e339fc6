//! Confidence-routed strategy selection.
//!
//! The router is a pure decision table over the retrieval outcome: no I/O,
//! no capability calls. Generative calls happen outside; when one comes back
//! empty, the pipeline re-enters the table with the corresponding
//! `*_failed` signal set and evaluation continues past that rule. A chosen
//! strategy is never retried.

pub mod config;
pub mod vocabulary;


pub use config::RouterConfig;
pub use vocabulary::{is_domain_query, DOMAIN_VOCABULARY};

use serde::{Deserialize, Serialize};

/// Fixed reply for queries nothing can answer.
pub const FALLBACK_MESSAGE: &str =
    "I'm not sure how to help with that. Could you ask about specific function parameters or rephrase your question?";

/// The five answer-construction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    KnowledgeOnly,
    KnowledgePlusGeneration,
    GenerationOnly,
    KnowledgeWithDisclaimer,
    Fallback,
}

impl Strategy {
    /// Returns the wire tag for this strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::KnowledgeOnly => "knowledge_only",
            Strategy::KnowledgePlusGeneration => "knowledge_plus_generation",
            Strategy::GenerationOnly => "generation_only",
            Strategy::KnowledgeWithDisclaimer => "knowledge_with_disclaimer",
            Strategy::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the decision table looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSignals {
    /// Whether the query matched the domain vocabulary.
    pub domain_relevance: bool,
    /// Number of retrieval candidates.
    pub candidate_count: usize,
    /// Best (lowest) similarity distance, when candidates exist.
    pub best_distance: Option<f32>,
    /// Whether a generative capability is configured.
    pub generation_available: bool,
    /// Set after a grounded generative call came back empty.
    pub enhancement_failed: bool,
    /// Set after an ungrounded generative call came back empty.
    pub generation_failed: bool,
}

impl RouteSignals {
    /// Builds signals for a fresh query (no failed generative attempts yet).
    pub fn new(
        query: &str,
        candidate_count: usize,
        best_distance: Option<f32>,
        generation_available: bool,
    ) -> Self {
        Self {
            domain_relevance: is_domain_query(query),
            candidate_count,
            best_distance,
            generation_available,
            enhancement_failed: false,
            generation_failed: false,
        }
    }
}

/// One routing outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Chosen strategy.
    pub strategy: Strategy,
    /// Final confidence for this strategy.
    pub confidence: f32,
    /// Confidence before any strategy-specific adjustment.
    pub raw_confidence: f32,
    /// Why this branch was taken.
    pub reason: String,
}

/// Maps a similarity distance to display/routing confidence.
///
/// Monotone decreasing; `0.0` distance maps to `1.0`, anything at or beyond
/// `2.0` maps to `0.0`. Recompute through this function wherever confidence
/// is shown so displayed values never drift from routed ones.
pub fn confidence_from_distance(distance: f32) -> f32 {
    ((2.0 - distance) / 2.0).clamp(0.0, 1.0)
}

/// The decision core: selects one of the five strategies.
#[derive(Debug, Clone, Default)]
pub struct ConfidenceRouter {
    config: RouterConfig,
}

impl ConfidenceRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Evaluates the decision table. First matching rule wins.
    pub fn route(&self, signals: &RouteSignals) -> Decision {
        let cfg = &self.config;

        // Rule 1: nothing retrieved at all.
        if signals.candidate_count == 0 {
            return Decision {
                strategy: Strategy::Fallback,
                confidence: 0.0,
                raw_confidence: 0.0,
                reason: "no candidates retrieved".to_string(),
            };
        }

        let best = signals.best_distance.unwrap_or(f32::INFINITY);
        let raw = confidence_from_distance(best);

        // Rule 2: excellent matches are trusted verbatim; generation would
        // only add verbosity and hallucination risk.
        if signals.domain_relevance && best < cfg.excellent_threshold {
            return Decision {
                strategy: Strategy::KnowledgeOnly,
                confidence: raw,
                raw_confidence: raw,
                reason: format!(
                    "excellent similarity {best:.3} < {:.1}, answering directly from knowledge",
                    cfg.excellent_threshold
                ),
            };
        }

        // Rule 3: good matches benefit from grounded generation.
        if signals.generation_available && !signals.enhancement_failed && best < cfg.good_threshold
        {
            return Decision {
                strategy: Strategy::KnowledgePlusGeneration,
                confidence: (raw + 0.1).min(0.9),
                raw_confidence: raw,
                reason: format!(
                    "good similarity {best:.3} < {:.1}, grounding a generated answer",
                    cfg.good_threshold
                ),
            };
        }

        // Rule 4: still a confident domain match once enhancement is off the
        // table.
        if signals.domain_relevance && best < cfg.high_confidence_threshold {
            return Decision {
                strategy: Strategy::KnowledgeOnly,
                confidence: raw,
                raw_confidence: raw,
                reason: format!(
                    "high-confidence similarity {best:.3} < {:.1}, answering from knowledge",
                    cfg.high_confidence_threshold
                ),
            };
        }

        // Rule 5: out-of-domain question with a poor match: answer without
        // grounding.
        if signals.generation_available
            && !signals.generation_failed
            && !signals.domain_relevance
            && best > cfg.good_threshold
        {
            return Decision {
                strategy: Strategy::GenerationOnly,
                confidence: 0.8,
                raw_confidence: raw,
                reason: format!(
                    "out-of-domain query with similarity {best:.3} > {:.1}, answering generatively",
                    cfg.good_threshold
                ),
            };
        }

        // Rule 6: domain question with only a middling match: answer from
        // knowledge but say where it came from.
        if signals.domain_relevance {
            return Decision {
                strategy: Strategy::KnowledgeWithDisclaimer,
                confidence: raw,
                raw_confidence: raw,
                reason: format!("medium-confidence domain match at similarity {best:.3}"),
            };
        }

        // Rules 7/8: whatever knowledge exists beats giving up.
        if signals.candidate_count > 0 {
            Decision {
                strategy: Strategy::KnowledgeOnly,
                confidence: raw,
                raw_confidence: raw,
                reason: format!("last-resort knowledge answer at similarity {best:.3}"),
            }
        } else {
            Decision {
                strategy: Strategy::Fallback,
                confidence: 0.0,
                raw_confidence: 0.0,
                reason: "no strategy applicable".to_string(),
            }
        }
    }
}
