//! Error types for the `healthbot-core` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data, matching symptoms or answering a query.
#[derive(Debug, Error)]
pub enum HealthbotError {
    /// A disease table or doctor directory could not be read or parsed.
    #[error("Failed to load {}: {message}", path.display())]
    DataLoad {
        /// The source file.
        path: PathBuf,
        /// A description of the failure.
        message: String,
    },

    /// A caller supplied an out-of-range argument (threshold, k).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The configuration file is unreadable or inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The web search service failed.
    #[error("{service}: {message}")]
    ExternalService {
        /// The external service that failed.
        service: &'static str,
        /// A description of the failure.
        message: String,
    },

    /// An error propagated from the retrieval layer.
    #[error(transparent)]
    Rag(#[from] healthbot_rag::RagError),
}

/// A convenience result type for HealthBot operations.
pub type Result<T> = std::result::Result<T, HealthbotError>;
