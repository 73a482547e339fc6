//! The parameter catalog: structured records and the loading seam.
//!
//! Persistence of the catalog (relational storage, upsert semantics) lives
//! outside this crate; all the pipeline needs is [`Catalog::list_records`].
//! [`JsonCatalog`] is the file-backed adapter used by the binary.

pub mod error;


pub use error::CatalogError;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Source tag used for terms that belong to no particular package.
pub const GLOBAL_SOURCE: &str = "__GLOBAL__";

/// One record of the parameter catalog.
///
/// Uniqueness follows the catalog schema: `(function, package, param)` for
/// input/output records, `(term, package)` for generic terms. Generic terms
/// carry no omit flag — the schema has none for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogRecord {
    /// An input parameter of a catalogued function.
    Input {
        function: String,
        package: String,
        param: String,
        #[serde(default)]
        explanation: String,
        #[serde(default)]
        example: String,
        #[serde(default)]
        default_value: Option<String>,
        #[serde(default)]
        omit: bool,
    },
    /// An output field of a catalogued function.
    Output {
        function: String,
        package: String,
        param: String,
        #[serde(default)]
        explanation: String,
        #[serde(default)]
        example: String,
        #[serde(default)]
        importance: Option<String>,
        #[serde(default)]
        omit: bool,
    },
    /// A package-level or global term.
    Generic {
        term: String,
        #[serde(default)]
        explanation: String,
        #[serde(default)]
        example: String,
        #[serde(default)]
        package: Option<String>,
    },
}

impl CatalogRecord {
    /// Returns `true` if the record is flagged to be left out of the index.
    pub fn is_omitted(&self) -> bool {
        match self {
            CatalogRecord::Input { omit, .. } | CatalogRecord::Output { omit, .. } => *omit,
            CatalogRecord::Generic { .. } => false,
        }
    }
}

/// Read access to the parameter catalog.
pub trait Catalog: Send + Sync {
    /// Returns every record in the catalog.
    fn list_records(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
}

/// JSON-file-backed catalog.
///
/// The file holds a flat array of [`CatalogRecord`]s tagged by `kind`.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Creates a catalog reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Catalog for JsonCatalog {
    fn list_records(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| CatalogError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let records: Vec<CatalogRecord> =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Parse {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(records)
    }
}
