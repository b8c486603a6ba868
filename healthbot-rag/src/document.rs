//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// A raw source document read from the corpus folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document (the path relative to the corpus root).
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a document without a source URI.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), source_uri: None }
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk, `{document_id}_{chunk_index}`.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// Position of the chunk within its parent document.
    pub chunk_index: usize,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    /// The retrieved chunk.
    pub chunk: &'a Chunk,
    /// The cosine similarity score (higher is more relevant).
    pub score: f32,
}
