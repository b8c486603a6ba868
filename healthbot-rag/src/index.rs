//! Persisted vector index with exact cosine-similarity search.
//!
//! A [`VectorIndex`] keeps its chunks in insertion order and scores every chunk
//! against the query, so results are exact and ties are broken by the order in
//! which chunks were indexed. The whole index is written to a single
//! `index.json` file inside the configured directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};

/// File name of the persisted index inside the vector store directory.
pub const INDEX_FILE: &str = "index.json";

const FORMAT_VERSION: u32 = 1;

/// An in-memory vector index that can be saved to and loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorIndex {
    version: u32,
    model: String,
    dimensions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    corpus_fingerprint: Option<String>,
    chunks: Vec<Chunk>,
}

impl VectorIndex {
    /// Create an index from embedded chunks.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidArgument`] if any chunk's embedding length
    /// differs from `dimensions`.
    pub fn new(
        model: impl Into<String>,
        dimensions: usize,
        chunks: Vec<Chunk>,
        corpus_fingerprint: Option<String>,
    ) -> Result<Self> {
        if let Some(chunk) = chunks.iter().find(|c| c.embedding.len() != dimensions) {
            return Err(RagError::InvalidArgument(format!(
                "chunk '{}' has {} dimensions, expected {dimensions}",
                chunk.id,
                chunk.embedding.len()
            )));
        }
        Ok(Self {
            version: FORMAT_VERSION,
            model: model.into(),
            dimensions,
            corpus_fingerprint,
            chunks,
        })
    }

    /// The embedding model the index was built with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Dimensionality of every stored embedding.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Fingerprint of the corpus the index was built from, if recorded.
    pub fn corpus_fingerprint(&self) -> Option<&str> {
        self.corpus_fingerprint.as_deref()
    }

    /// Indexed chunks in insertion order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Return the `top_k` chunks most similar to `embedding`, by descending
    /// cosine similarity. Equal scores keep insertion order.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult<'_>> {
        let mut scored: Vec<SearchResult<'_>> = self
            .chunks
            .iter()
            .map(|chunk| {
                SearchResult { chunk, score: cosine_similarity(&chunk.embedding, embedding) }
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        scored
    }

    /// Path of the index file inside `dir`.
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE)
    }

    /// Whether a persisted index exists in `dir`.
    pub fn exists(dir: &Path) -> bool {
        Self::file_path(dir).is_file()
    }

    /// Persist the index to `dir/index.json`, creating `dir` if needed.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place, so readers never observe a half-written index.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| RagError::io(dir, e))?;

        let path = Self::file_path(dir);
        let tmp = dir.join(format!("{INDEX_FILE}.tmp"));
        let data = serde_json::to_vec(self)?;
        fs::write(&tmp, data).map_err(|e| RagError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| RagError::io(&path, e))?;

        info!(path = %path.display(), chunk_count = self.len(), "saved vector index");
        Ok(path)
    }

    /// Load a persisted index from `dir`, validating it against the active
    /// embedder's dimensionality.
    ///
    /// # Errors
    ///
    /// - [`RagError::IndexNotFound`] if `dir/index.json` does not exist
    /// - [`RagError::CorruptIndex`] if the file cannot be parsed, has an unknown
    ///   format version, or its dimensionality differs from `expected_dimensions`
    pub fn load(dir: &Path, expected_dimensions: usize) -> Result<Self> {
        let path = Self::file_path(dir);
        if !path.is_file() {
            return Err(RagError::IndexNotFound { path });
        }

        let data = fs::read(&path).map_err(|e| RagError::io(&path, e))?;
        let index: VectorIndex = serde_json::from_slice(&data).map_err(|e| RagError::CorruptIndex {
            path: path.clone(),
            message: format!("unreadable index file: {e}"),
        })?;

        if index.version != FORMAT_VERSION {
            return Err(RagError::CorruptIndex {
                path,
                message: format!("unsupported format version {}", index.version),
            });
        }
        if index.dimensions != expected_dimensions {
            return Err(RagError::CorruptIndex {
                path,
                message: format!(
                    "index has {} dimensions but the embedder produces {expected_dimensions}",
                    index.dimensions
                ),
            });
        }
        if let Some(chunk) = index.chunks.iter().find(|c| c.embedding.len() != index.dimensions) {
            return Err(RagError::CorruptIndex {
                path,
                message: format!(
                    "chunk '{}' has {} dimensions, expected {}",
                    chunk.id,
                    chunk.embedding.len(),
                    index.dimensions
                ),
            });
        }

        debug!(
            path = %path.display(),
            chunk_count = index.len(),
            model = %index.model,
            "loaded vector index"
        );
        Ok(index)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
