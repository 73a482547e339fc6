use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned when loading the catalog.
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file was not valid JSON for the expected record shape.
    #[error("failed to parse catalog '{path}': {source}")]
    Parse {
        /// Catalog file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
