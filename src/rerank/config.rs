/// Instruction embedded in every judgment prompt unless overridden.
pub const DEFAULT_INSTRUCTION: &str =
    "Given a web search query, retrieve relevant passages that answer the query";

/// Candidates fetched from retrieval before reranking.
pub const DEFAULT_RETRIEVE_K: usize = 10;

/// Candidates kept after reranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Reranker configuration.
#[derive(Debug, Clone)]
pub struct RerankerConfig {
    /// Instruction text for the judgment prompt.
    pub instruction: String,

    /// Relevance assigned to every candidate when the scoring capability
    /// fails (retrieval order is preserved in that case).
    pub neutral_relevance: f32,
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            neutral_relevance: 0.5,
        }
    }
}
