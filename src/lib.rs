//! Parlance library crate (used by the server binary and integration tests).
//!
//! Parlance answers natural-language questions about a fixed catalog of
//! function parameters: embedding retrieval over a vector index, calibrated
//! cross-encoder reranking, confidence-routed strategy selection, and
//! generative synthesis with a general-purpose fallback.
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CatalogRecord`], [`Catalog`], [`JsonCatalog`] - The parameter catalog
//! - [`DocumentUnit`], [`materialize`] - Catalog records as indexable units
//! - [`Pipeline`], [`Response`] - The `ask` operation
//!
//! ## Retrieval & Scoring
//! - [`RetrievalEngine`], [`Candidate`] - Top-k candidate lookup
//! - [`Reranker`], [`ScoredCandidate`] - Two-logit calibrated reranking
//! - [`ConfidenceRouter`], [`RouterConfig`], [`Strategy`] - Strategy selection
//!
//! ## Synthesis
//! - [`Synthesizer`], [`AnswerStream`] - Grounded generation (blocking/streaming)
//! - [`format_answer`], [`KnowledgeAnswer`] - Pure-knowledge formatting
//!
//! ## Capability Seams
//! - [`Embedder`], [`VectorIndex`], [`RerankScorer`], [`Generator`] with
//!   production adapters; mocks live behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod materialize;
pub mod pipeline;
pub mod rerank;
pub mod retrieval;
pub mod router;
pub mod synthesis;

pub use catalog::{Catalog, CatalogError, CatalogRecord, JsonCatalog, GLOBAL_SOURCE};
pub use config::{Config, ConfigError};
pub use hashing::{hash_to_u64, unit_id};
pub use materialize::{materialize, materialize_all, DocumentUnit, SectionKind, UnitMetadata};

pub use embedding::{Embedder, EmbeddingError, HttpEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;

pub use index::{
    index_units, IndexError, IndexHit, IndexPoint, QdrantIndex, VectorIndex,
    DEFAULT_COLLECTION_NAME,
};
#[cfg(any(test, feature = "mock"))]
pub use index::MockVectorIndex;

pub use retrieval::{Candidate, RetrievalEngine};

pub use rerank::{
    build_prompt, calibrate, HttpRerankScorer, RerankError, RerankScorer, Reranker,
    RerankerConfig, ScoredCandidate, DEFAULT_INSTRUCTION, DEFAULT_RETRIEVE_K, DEFAULT_TOP_N,
};
#[cfg(any(test, feature = "mock"))]
pub use rerank::MockRerankScorer;

pub use router::{
    confidence_from_distance, is_domain_query, ConfidenceRouter, Decision, RouteSignals,
    RouterConfig, Strategy, DOMAIN_VOCABULARY, FALLBACK_MESSAGE,
};

pub use synthesis::{
    build_general_prompt, build_grounding_prompt, extract_answer, format_answer, AnswerStream,
    FormatterConfig, GenaiGenerator, Generator, GeneratorError, KnowledgeAnswer, Synthesizer,
    ANSWER_DELIMITER,
};
#[cfg(any(test, feature = "mock"))]
pub use synthesis::MockGenerator;

pub use pipeline::{
    Pipeline, PipelineError, Response, DISCLAIMER_PREFIX, ENHANCED_SOURCE, GENERATIVE_SOURCE,
    GROUNDING_CONTEXT_LIMIT,
};

pub use gateway::{create_router, AppState};
