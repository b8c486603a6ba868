//! HealthBot configuration.
//!
//! Settings come from three layers, later layers winning: built-in defaults,
//! an optional TOML file, then environment variables (a `.env` file in the
//! working directory is loaded first when present).
//!
//! ```toml
//! [paths]
//! documents_dir = "data/medical_documents"
//!
//! [matching]
//! threshold = 0.5
//! similarity = "jaro-winkler"
//!
//! [web]
//! enabled = false
//!
//! [response]
//! mode = "detailed"
//! ```

use std::path::{Path, PathBuf};

use healthbot_rag::RagConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::ResponseMode;
use crate::error::{HealthbotError, Result};
use crate::similarity::SimilarityKind;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "healthbot.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthbotConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub response: ResponseConfig,
}

/// Locations of the knowledge sources and the persisted index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub medical_csv: PathBuf,
    pub doctors_json: PathBuf,
    pub documents_dir: PathBuf,
    pub vector_store_dir: PathBuf,
}

impl PathsConfig {
    /// Standard layout below a single data directory.
    pub fn under(data_dir: &Path) -> Self {
        Self {
            medical_csv: data_dir.join("medical_knowledge.csv"),
            doctors_json: data_dir.join("doctors.json"),
            documents_dir: data_dir.join("medical_documents"),
            vector_store_dir: data_dir.join("vector_store"),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::under(Path::new("data"))
    }
}

/// Chunking and retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_retrieved_docs: usize,
    pub embedding_dimensions: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: healthbot_rag::config::DEFAULT_CHUNK_SIZE,
            chunk_overlap: healthbot_rag::config::DEFAULT_CHUNK_OVERLAP,
            max_retrieved_docs: healthbot_rag::config::DEFAULT_TOP_K,
            embedding_dimensions: healthbot_rag::hashing::DEFAULT_DIMENSIONS,
        }
    }
}

/// Symptom matching settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum disease score for a match to be reported.
    pub threshold: f64,
    /// Per-token similarity a disease symptom must exceed to count as matched.
    pub token_cutoff: f64,
    pub similarity: SimilarityKind,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: crate::matcher::DEFAULT_THRESHOLD,
            token_cutoff: crate::matcher::DEFAULT_TOKEN_CUTOFF,
            similarity: SimilarityKind::default(),
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    pub enabled: bool,
    /// Usually supplied through `SERPER_API_KEY` rather than the file.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub serper_api_key: String,
    pub endpoint: String,
    pub results_limit: usize,
    pub timeout_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            serper_api_key: String::new(),
            endpoint: crate::web_search::SERPER_ENDPOINT.to_string(),
            results_limit: 10,
            timeout_secs: 10,
        }
    }
}

/// Reply rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    pub mode: ResponseMode,
    /// Delay between characters of the typing animation.
    pub typing_delay_ms: u64,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self { mode: ResponseMode::Concise, typing_delay_ms: 10 }
    }
}

impl HealthbotConfig {
    /// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
    /// exists, then apply `.env` and environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`HealthbotError::Config`] if an explicitly given file is
    /// missing, any file fails to parse, or the result is inconsistent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_from(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without applying environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HealthbotError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| HealthbotError::Config(format!("failed to parse config: {e}")))
    }

    /// Apply `HEALTHBOT_DATA_DIR` and `SERPER_API_KEY` using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("HEALTHBOT_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.paths = PathsConfig::under(Path::new(dir.trim()));
        }
        if let Some(key) = lookup("SERPER_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.web.serper_api_key = key.trim().to_string();
        }
    }

    /// Check value ranges and chunking consistency.
    pub fn validate(&self) -> Result<()> {
        let unit_values = [
            ("matching.threshold", self.matching.threshold),
            ("matching.token_cutoff", self.matching.token_cutoff),
        ];
        for (name, value) in unit_values {
            if !(0.0..=1.0).contains(&value) {
                return Err(HealthbotError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.retrieval.embedding_dimensions == 0 {
            return Err(HealthbotError::Config(
                "retrieval.embedding_dimensions must be greater than zero".into(),
            ));
        }
        self.rag_config()?;
        Ok(())
    }

    /// The validated chunking and retrieval configuration.
    pub fn rag_config(&self) -> Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.retrieval.chunk_size)
            .chunk_overlap(self.retrieval.chunk_overlap)
            .top_k(self.retrieval.max_retrieved_docs)
            .build()
            .map_err(|e| HealthbotError::Config(e.to_string()))
    }
}
