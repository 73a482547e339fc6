use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the rerank scoring capability.
pub enum RerankError {
    /// The scoring service could not be reached or answered non-success.
    #[error("rerank request to '{url}' failed: {message}")]
    RequestFailed {
        /// Service URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The service answered with a body the adapter could not interpret.
    #[error("invalid rerank response: {reason}")]
    InvalidResponse {
        /// What was wrong.
        reason: String,
    },
}
