//! Error types for the `healthbot-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, persisting or querying a vector index.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The document corpus was empty, so no index could be built.
    ///
    /// This is the "no index available" signal: callers distinguish it from a
    /// search that simply found nothing.
    #[error("No index available: the document corpus is empty")]
    EmptyCorpus,

    /// No persisted index exists at the given location.
    #[error("No persisted index found at {}", path.display())]
    IndexNotFound {
        /// The file that was looked up.
        path: PathBuf,
    },

    /// A persisted index exists but cannot be used with the active embedder.
    #[error("Corrupt index at {}: {message} (rebuild the index)", path.display())]
    CorruptIndex {
        /// The offending index file.
        path: PathBuf,
        /// A description of the mismatch.
        message: String,
    },

    /// A caller supplied an out-of-range argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The index could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
