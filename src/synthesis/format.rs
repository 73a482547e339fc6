//! Pure-knowledge answer formatting.

use crate::materialize::SectionKind;
use crate::rerank::ScoredCandidate;
use crate::router::confidence_from_distance;

/// Reply used when the knowledge side has nothing at all.
pub const NO_KNOWLEDGE_MESSAGE: &str =
    "I don't have specific information about that in my knowledge base.";

/// Knowledge-formatting knobs.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Related concepts must be at least this similar (distance below).
    pub related_threshold: f32,

    /// At most this many related concepts are appended.
    pub related_limit: usize,

    /// Related-concept previews are cut to this many characters.
    pub preview_len: usize,

    /// Related concepts are only shown above this confidence.
    pub min_confidence_for_related: f32,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            related_threshold: 1.5,
            related_limit: 2,
            preview_len: 100,
            min_confidence_for_related: 0.3,
        }
    }
}

/// A formatted pure-knowledge answer.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeAnswer {
    /// Rendered answer text.
    pub answer: String,
    /// Citations, best match first.
    pub sources: Vec<String>,
    /// Confidence derived from the best similarity distance.
    pub confidence: f32,
}

/// Renders ranked candidates into a knowledge answer.
///
/// The top-ranked candidate becomes the main entry (its first text line is
/// the title, the rest the explanation); up to `related_limit` sufficiently
/// similar runners-up are appended as previews.
pub fn format_answer(ranked: &[ScoredCandidate], config: &FormatterConfig) -> KnowledgeAnswer {
    let Some(best) = ranked.first() else {
        return KnowledgeAnswer {
            answer: NO_KNOWLEDGE_MESSAGE.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
        };
    };

    // Confidence tracks the best retrieval distance, not the rerank order,
    // so it agrees with what the router computed for the same query.
    let best_distance = ranked
        .iter()
        .map(|s| s.candidate.distance)
        .fold(f32::INFINITY, f32::min);
    let confidence = confidence_from_distance(best_distance);

    let mut answer_parts: Vec<String> = Vec::new();
    let mut sources: Vec<String> = Vec::new();

    let metadata = &best.candidate.unit.metadata;
    let text = &best.candidate.unit.text;

    match metadata.section {
        SectionKind::Generic => {
            answer_parts.push(format!("**{}**: {}", metadata.name, text));
        }
        SectionKind::Input | SectionKind::Output => {
            let mut lines = text.lines();
            let title = lines.next().unwrap_or(&metadata.name);
            let explanation = lines.collect::<Vec<_>>().join("\n");
            let explanation = if explanation.is_empty() {
                text.as_str()
            } else {
                explanation.as_str()
            };

            answer_parts.push(format!("**{title}**: {explanation}"));
        }
    }
    sources.push(metadata.citation());

    if confidence > config.min_confidence_for_related {
        let related: Vec<String> = ranked[1..]
            .iter()
            .filter(|s| s.candidate.distance < config.related_threshold)
            .take(config.related_limit)
            .map(|s| related_preview(s, config.preview_len))
            .collect();

        if !related.is_empty() {
            answer_parts.push("\n**Related concepts**:".to_string());
            for item in related {
                answer_parts.push(format!("• {item}"));
            }
        }
    }

    KnowledgeAnswer {
        answer: answer_parts.join("\n\n"),
        sources,
        confidence,
    }
}

fn related_preview(scored: &ScoredCandidate, preview_len: usize) -> String {
    let metadata = &scored.candidate.unit.metadata;
    let text = &scored.candidate.unit.text;

    let body = match metadata.section {
        SectionKind::Generic => text.as_str(),
        SectionKind::Input | SectionKind::Output => {
            // Second line is the explanation; fall back to the first.
            let mut lines = text.lines();
            let first = lines.next().unwrap_or("");
            lines.next().unwrap_or(first)
        }
    };

    format!("**{}**: {}...", metadata.name, truncate(body, preview_len))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
