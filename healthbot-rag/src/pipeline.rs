//! Retrieval pipeline orchestrator.
//!
//! The [`RetrievalPipeline`] builds a [`VectorIndex`] from raw documents
//! (chunk → embed → index), persists it, and answers nearest-neighbour
//! queries. The index is obtained lazily on the first retrieval: a persisted
//! copy is loaded if present, otherwise the corpus folder is read, indexed and
//! saved. Once obtained, the index is kept for the life of the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use healthbot_rag::{HashingEmbeddingProvider, RagConfig, RetrievalPipeline};
//!
//! let pipeline = RetrievalPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbeddingProvider::default()))
//!     .corpus_dir("data/medical_documents")
//!     .store_dir("data/vector_store")
//!     .build()?;
//!
//! let passages = pipeline.retrieve("persistent cough", 5).await?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::loader::{corpus_fingerprint, load_corpus};
use crate::text::normalize_whitespace;

/// The retrieval pipeline orchestrator.
///
/// Construct one via [`RetrievalPipeline::builder()`].
pub struct RetrievalPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
    corpus_dir: PathBuf,
    store_dir: PathBuf,
    index: OnceCell<VectorIndex>,
}

impl RetrievalPipeline {
    /// Create a new [`RetrievalPipelineBuilder`].
    pub fn builder() -> RetrievalPipelineBuilder {
        RetrievalPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Folder the corpus is read from when no persisted index exists.
    pub fn corpus_dir(&self) -> &Path {
        &self.corpus_dir
    }

    /// Folder the index is persisted to.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Build an index from `documents`: chunk → embed → index.
    ///
    /// Nothing is written to disk; see [`build_and_save`](Self::build_and_save).
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] if `documents` is empty or yields no chunks
    /// - [`RagError::EmbeddingError`] if the provider fails or returns vectors
    ///   of the wrong length
    pub async fn build(&self, documents: &[Document]) -> Result<VectorIndex> {
        let mut chunks: Vec<_> = documents.iter().flat_map(|d| self.chunker.chunk(d)).collect();
        if chunks.is_empty() {
            warn!(document_count = documents.len(), "no chunks to index");
            return Err(RagError::EmptyCorpus);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during index build");
            e
        })?;

        let model = self.embedding_provider.model().to_string();
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: model,
                message: format!("expected {} embeddings, got {}", chunks.len(), embeddings.len()),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let dimensions = self.embedding_provider.dimensions();
        let fingerprint = Some(corpus_fingerprint(documents));
        let index = VectorIndex::new(model.clone(), dimensions, chunks, fingerprint)
            .map_err(|e| RagError::EmbeddingError { provider: model, message: e.to_string() })?;

        info!(document_count = documents.len(), chunk_count = index.len(), "built vector index");
        Ok(index)
    }

    /// Build an index from `documents` and persist it to the store directory.
    pub async fn build_and_save(&self, documents: &[Document]) -> Result<VectorIndex> {
        let index = self.build(documents).await?;
        index.save(&self.store_dir)?;
        Ok(index)
    }

    /// Read the corpus folder, build a fresh index and persist it, replacing
    /// any existing file. The in-memory index of this pipeline is not replaced.
    pub async fn rebuild(&self) -> Result<VectorIndex> {
        let documents = load_corpus(&self.corpus_dir)?;
        self.build_and_save(&documents).await
    }

    /// Load the persisted index, validated against the active embedder.
    ///
    /// # Errors
    ///
    /// [`RagError::IndexNotFound`] or [`RagError::CorruptIndex`]; see
    /// [`VectorIndex::load`].
    pub fn load(&self) -> Result<VectorIndex> {
        let index = VectorIndex::load(&self.store_dir, self.embedding_provider.dimensions())?;
        if index.model() != self.embedding_provider.model() {
            warn!(
                index_model = index.model(),
                active_model = self.embedding_provider.model(),
                "persisted index was built with a different embedding model; rebuild recommended"
            );
        }
        Ok(index)
    }

    /// Return the index, loading or building it on first use.
    ///
    /// Initialisation runs at most once; concurrent callers wait for it. A
    /// failed initialisation is not cached, so an empty corpus is re-read on
    /// the next call.
    pub async fn index(&self) -> Result<&VectorIndex> {
        self.index.get_or_try_init(|| self.load_or_build()).await
    }

    async fn load_or_build(&self) -> Result<VectorIndex> {
        match self.load() {
            Ok(index) => {
                self.warn_if_stale(&index);
                Ok(index)
            }
            Err(RagError::IndexNotFound { path }) => {
                info!(
                    path = %path.display(),
                    corpus = %self.corpus_dir.display(),
                    "no persisted index, building from corpus"
                );
                self.rebuild().await
            }
            Err(e) => Err(e),
        }
    }

    fn warn_if_stale(&self, index: &VectorIndex) {
        let Some(stored) = index.corpus_fingerprint() else { return };
        match load_corpus(&self.corpus_dir) {
            Ok(documents) if corpus_fingerprint(&documents) != stored => {
                warn!(
                    corpus = %self.corpus_dir.display(),
                    "document corpus changed since the index was built; rebuild to include it"
                );
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "could not check index staleness"),
        }
    }

    /// Retrieve the `k` chunks nearest to `query` from the lazily obtained index.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] if `k == 0`
    /// - [`RagError::EmptyCorpus`] if no index exists and the corpus is empty
    /// - [`RagError::CorruptIndex`] if the persisted index is unusable
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>> {
        if k == 0 {
            return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
        }
        let index = self.index().await?;
        self.retrieve_from(index, query, k).await
    }

    /// Retrieve the `k` chunks nearest to `query` from `index`.
    ///
    /// Results are ordered by descending similarity, ties in insertion order,
    /// and each text has its whitespace collapsed to single spaces.
    pub async fn retrieve_from(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Result<Vec<String>> {
        if k == 0 {
            return Err(RagError::InvalidArgument("k must be greater than zero".to_string()));
        }
        let embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        let results = index.search(&embedding, k);
        info!(result_count = results.len(), "retrieval completed");
        Ok(results.iter().map(|r| normalize_whitespace(&r.chunk.text)).collect())
    }
}

/// Builder for constructing a [`RetrievalPipeline`].
///
/// `embedding_provider`, `corpus_dir` and `store_dir` are required. The
/// configuration defaults to [`RagConfig::default`] and the chunker to a
/// [`RecursiveChunker`] sized from that configuration.
#[derive(Default)]
pub struct RetrievalPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
    corpus_dir: Option<PathBuf>,
    store_dir: Option<PathBuf>,
}

impl RetrievalPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the folder the corpus is read from.
    pub fn corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = Some(dir.into());
        self
    }

    /// Set the folder the index is persisted to.
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = Some(dir.into());
        self
    }

    /// Build the [`RetrievalPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RetrievalPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let corpus_dir = self
            .corpus_dir
            .ok_or_else(|| RagError::ConfigError("corpus_dir is required".to_string()))?;
        let store_dir = self
            .store_dir
            .ok_or_else(|| RagError::ConfigError("store_dir is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });

        Ok(RetrievalPipeline {
            config,
            embedding_provider,
            chunker,
            corpus_dir,
            store_dir,
            index: OnceCell::new(),
        })
    }
}
