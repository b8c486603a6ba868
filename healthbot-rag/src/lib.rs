//! Semantic retrieval over a local document corpus for HealthBot.
//!
//! This crate provides:
//! - Recursive, overlap-aware document chunking ([`RecursiveChunker`])
//! - The [`EmbeddingProvider`] trait and a deterministic local embedder
//!   ([`HashingEmbeddingProvider`])
//! - A persisted, exact cosine-similarity [`VectorIndex`]
//! - Corpus loading from a folder of text, markdown and PDF files
//! - The [`RetrievalPipeline`], which lazily loads or builds the index and
//!   answers nearest-neighbour queries
//! - Text helpers used when rendering retrieved passages ([`truncate`],
//!   [`normalize_whitespace`], [`first_sentence`])

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hashing;
pub mod index;
pub mod loader;
pub mod pipeline;
pub mod text;

pub use chunking::{Chunker, RecursiveChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use hashing::HashingEmbeddingProvider;
pub use index::VectorIndex;
pub use loader::{corpus_fingerprint, load_corpus};
pub use pipeline::{RetrievalPipeline, RetrievalPipelineBuilder};
pub use text::{first_sentence, normalize_whitespace, truncate};
