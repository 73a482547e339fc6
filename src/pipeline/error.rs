use thiserror::Error;

#[derive(Debug, Error)]
/// Errors surfaced to `ask` callers.
///
/// Capability failures never land here — they degrade inside the pipeline.
pub enum PipelineError {
    /// The query was empty after trimming.
    #[error("query must not be empty")]
    EmptyQuery,
}
