//! Core of the HealthBot assistant.
//!
//! A query flows through three sources whose results are concatenated into
//! one reply:
//!
//! 1. [`SymptomMatcher`] fuzzily scores the query against the disease table
//!    held by the [`KnowledgeStore`], and [`recommend`] looks up doctors for
//!    every matched disease.
//! 2. The retrieval pipeline from `healthbot-rag` returns related passages
//!    from the local document corpus.
//! 3. An optional [`WebSearch`] backend adds live search results.
//!
//! [`assemble`] formats everything in a [`ResponseMode`] and appends the
//! [`DISCLAIMER`]. [`AppContext`] owns the long-lived pieces and runs the
//! whole flow through [`AppContext::answer`].

pub mod assembler;
pub mod config;
pub mod context;
pub mod doctors;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod similarity;
pub mod web_search;

pub use assembler::{DISCLAIMER, ResponseMode, assemble};
pub use config::HealthbotConfig;
pub use context::{AppContext, QueryOptions, Reply};
pub use doctors::recommend;
pub use error::{HealthbotError, Result};
pub use knowledge::{DiseaseRecord, DoctorRecord, KnowledgeStore, load_diseases, load_doctors};
pub use matcher::{MatchResult, SymptomMatcher};
pub use similarity::{IndelRatio, JaroWinkler, LevenshteinRatio, SimilarityKind, StringSimilarity};
pub use web_search::{SerperSearch, WebSearch};
