use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the embedding capability.
pub enum EmbeddingError {
    /// The embedding service could not be reached or answered non-success.
    #[error("embedding request to '{url}' failed: {message}")]
    RequestFailed {
        /// Service URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The service answered with a body the adapter could not interpret.
    #[error("invalid embedding response: {reason}")]
    InvalidResponse {
        /// What was wrong.
        reason: String,
    },

    /// The service returned no vector for the input.
    #[error("embedding service returned an empty result")]
    EmptyResult,
}
