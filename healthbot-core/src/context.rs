//! Application context tying the components together.
//!
//! [`AppContext`] is constructed once at startup and owns every long-lived
//! resource: the knowledge store, the symptom matcher, the retrieval pipeline
//! (with its lazily initialised index) and the web search backend.

use std::sync::Arc;

use healthbot_rag::{HashingEmbeddingProvider, RagError, RetrievalPipeline};
use tracing::{info, instrument, warn};

use crate::assembler::{ResponseMode, assemble};
use crate::config::HealthbotConfig;
use crate::doctors::recommend;
use crate::error::{HealthbotError, Result};
use crate::knowledge::KnowledgeStore;
use crate::matcher::{MatchResult, SymptomMatcher};
use crate::web_search::{SerperSearch, WebSearch};

/// Per-query options chosen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub mode: ResponseMode,
    pub use_web: bool,
}

impl QueryOptions {
    /// Options taken from the configuration defaults.
    pub fn from_config(config: &HealthbotConfig) -> Self {
        Self { mode: config.response.mode, use_web: config.web.enabled }
    }
}

/// The structured results of one query together with the assembled text.
#[derive(Debug, Clone)]
pub struct Reply<'a> {
    pub matches: Vec<MatchResult<'a>>,
    pub retrieved: Vec<String>,
    /// `None` when web search was not requested.
    pub web_results: Option<Vec<String>>,
    pub text: String,
}

/// Process-wide state shared by every query.
pub struct AppContext {
    config: HealthbotConfig,
    knowledge: KnowledgeStore,
    matcher: SymptomMatcher,
    pipeline: RetrievalPipeline,
    web: Arc<dyn WebSearch>,
}

impl AppContext {
    /// Load the knowledge sources and wire up the components described by `config`.
    ///
    /// Missing or malformed knowledge files are logged and replaced by empty
    /// collections. The vector index is not touched until the first retrieval.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is inconsistent or the HTTP
    /// client cannot be created.
    pub fn from_config(config: HealthbotConfig) -> Result<Self> {
        let knowledge = KnowledgeStore::load(&config.paths.medical_csv, &config.paths.doctors_json);
        let web: Arc<dyn WebSearch> = Arc::new(SerperSearch::new(&config.web)?);
        Self::with_components(config, knowledge, web)
    }

    /// Wire up a context from an already loaded knowledge store and a custom
    /// web search backend.
    pub fn with_components(
        config: HealthbotConfig,
        knowledge: KnowledgeStore,
        web: Arc<dyn WebSearch>,
    ) -> Result<Self> {
        config.validate()?;
        let matcher =
            SymptomMatcher::new(config.matching.similarity.build(), config.matching.token_cutoff)?;
        let embedder = HashingEmbeddingProvider::new(config.retrieval.embedding_dimensions)?;
        let pipeline = RetrievalPipeline::builder()
            .config(config.rag_config()?)
            .embedding_provider(Arc::new(embedder))
            .corpus_dir(&config.paths.documents_dir)
            .store_dir(&config.paths.vector_store_dir)
            .build()?;

        Ok(Self { config, knowledge, matcher, pipeline, web })
    }

    pub fn config(&self) -> &HealthbotConfig {
        &self.config
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn matcher(&self) -> &SymptomMatcher {
        &self.matcher
    }

    pub fn pipeline(&self) -> &RetrievalPipeline {
        &self.pipeline
    }

    /// Rank diseases for `query` with the configured threshold.
    pub fn match_symptoms(&self, query: &str) -> Result<Vec<MatchResult<'_>>> {
        self.matcher.rank(query, self.knowledge.diseases(), self.config.matching.threshold)
    }

    /// Retrieve up to `max_retrieved_docs` passages, surfacing retrieval errors.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>> {
        Ok(self.pipeline.retrieve(query, self.pipeline.config().top_k).await?)
    }

    /// Answer one query.
    ///
    /// Retrieval and web failures degrade to missing blocks so a reply is
    /// always produced; only invalid matcher settings are returned as errors.
    #[instrument(skip(self), fields(mode = %options.mode, use_web = options.use_web))]
    pub async fn answer(&self, query: &str, options: QueryOptions) -> Result<Reply<'_>> {
        let matches = self.match_symptoms(query)?;

        let retrieved = match self.retrieve(query).await {
            Ok(passages) => passages,
            Err(HealthbotError::Rag(RagError::EmptyCorpus)) => {
                info!(corpus = %self.pipeline.corpus_dir().display(), "no documents to search");
                Vec::new()
            }
            Err(HealthbotError::Rag(e @ RagError::CorruptIndex { .. })) => {
                warn!(error = %e, "vector index unusable; run `healthbot index rebuild`");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "retrieval failed, continuing without related knowledge");
                Vec::new()
            }
        };

        let web_results = if options.use_web { Some(self.web.search(query).await) } else { None };

        let doctors = self.knowledge.doctors();
        let text = assemble(
            &matches,
            |name: &str| recommend(name, doctors),
            &retrieved,
            web_results.as_deref(),
            options.mode,
        );

        Ok(Reply { matches, retrieved, web_results, text })
    }
}
