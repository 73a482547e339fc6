use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the generative capability.
pub enum GeneratorError {
    /// The provider rejected or failed the request.
    #[error("generation failed for model '{model}': {message}")]
    Provider {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// The stream broke mid-response.
    #[error("generation stream interrupted: {message}")]
    StreamInterrupted {
        /// Error message.
        message: String,
    },
}
