//! Turns catalog records into indexable knowledge units.
//!
//! Materialization is a pure transformation: the semantic text is the
//! record's name, explanation and example (and importance, for outputs)
//! joined by newlines with empty fields filtered out, and the metadata is
//! the fixed set of fields downstream formatting needs. Records flagged
//! `omit` or with nothing to say produce no unit.


use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRecord, GLOBAL_SOURCE};
use crate::hashing::unit_id;

/// Which catalog section a unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Input,
    Output,
    Generic,
}

impl SectionKind {
    /// Returns the section name as stored in index payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Input => "input",
            SectionKind::Output => "output",
            SectionKind::Generic => "generic",
        }
    }
}

/// Metadata carried alongside a unit's semantic text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Catalog section the unit came from.
    pub section: SectionKind,
    /// Owning package.
    pub package: String,
    /// Owning function (input/output units only).
    pub function: Option<String>,
    /// Parameter name, or term name for generic units.
    pub name: String,
    /// Default value, when the catalog records one (input units).
    pub default_value: Option<String>,
    /// Importance marker, when the catalog records one (output units).
    pub importance: Option<String>,
    /// Package name, or [`GLOBAL_SOURCE`] for global terms.
    pub source: String,
}

impl UnitMetadata {
    /// Returns the human-readable citation for this unit.
    ///
    /// `package.function.param` for parameters, `Generic concept: term` for
    /// terms.
    pub fn citation(&self) -> String {
        match &self.function {
            Some(function) => format!("{}.{}.{}", self.package, function, self.name),
            None => format!("Generic concept: {}", self.name),
        }
    }
}

/// A materialized knowledge unit: what gets embedded and retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentUnit {
    /// Stable id, shared with the vector index.
    pub id: u64,
    /// Semantic text body.
    pub text: String,
    /// Metadata for citation and formatting.
    pub metadata: UnitMetadata,
}

/// Materializes one catalog record into a unit.
///
/// Returns `None` when the record is flagged `omit` or when its semantic
/// text is empty after filtering empty fields.
pub fn materialize(record: &CatalogRecord) -> Option<DocumentUnit> {
    if record.is_omitted() {
        return None;
    }

    let (text, metadata) = match record {
        CatalogRecord::Input {
            function,
            package,
            param,
            explanation,
            example,
            default_value,
            ..
        } => (
            join_semantic_fields(&[param.as_str(), explanation.as_str(), example.as_str()]),
            UnitMetadata {
                section: SectionKind::Input,
                package: package.clone(),
                function: Some(function.clone()),
                name: param.clone(),
                default_value: default_value.clone(),
                importance: None,
                source: package.clone(),
            },
        ),
        CatalogRecord::Output {
            function,
            package,
            param,
            explanation,
            example,
            importance,
            ..
        } => (
            join_semantic_fields(&[
                param.as_str(),
                explanation.as_str(),
                example.as_str(),
                importance.as_deref().unwrap_or(""),
            ]),
            UnitMetadata {
                section: SectionKind::Output,
                package: package.clone(),
                function: Some(function.clone()),
                name: param.clone(),
                default_value: None,
                importance: importance.clone(),
                source: package.clone(),
            },
        ),
        CatalogRecord::Generic {
            term,
            explanation,
            example,
            package,
        } => {
            let source = package.clone().unwrap_or_else(|| GLOBAL_SOURCE.to_string());
            (
                join_semantic_fields(&[term.as_str(), explanation.as_str(), example.as_str()]),
                UnitMetadata {
                    section: SectionKind::Generic,
                    package: source.clone(),
                    function: None,
                    name: term.clone(),
                    default_value: None,
                    importance: None,
                    source,
                },
            )
        }
    };

    if text.is_empty() {
        return None;
    }

    let id = unit_id(&metadata.citation(), &text);

    Some(DocumentUnit { id, text, metadata })
}

/// Materializes a whole catalog listing, dropping omitted and empty records.
pub fn materialize_all(records: &[CatalogRecord]) -> Vec<DocumentUnit> {
    records.iter().filter_map(materialize).collect()
}

fn join_semantic_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .filter(|f| !f.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}
