//! Fuzzy symptom matching against the disease table.

use tracing::debug;

use crate::error::{HealthbotError, Result};
use crate::knowledge::{DiseaseRecord, parse_symptom_list};
use crate::similarity::{IndelRatio, StringSimilarity};

/// Minimum disease score reported when the caller does not choose one.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Similarity a disease symptom must exceed against some user token to count.
pub const DEFAULT_TOKEN_CUTOFF: f64 = 0.6;

/// A disease together with the fraction of its symptoms found in the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub disease: &'a DiseaseRecord,
    pub score: f64,
}

/// Scores free-text symptom queries against disease symptom lists.
///
/// # Example
///
/// ```
/// use healthbot_core::{DiseaseRecord, SymptomMatcher};
///
/// let diseases = vec![DiseaseRecord::new("Flu", ["fever", "cough", "fatigue"], "", "", "")];
/// let matcher = SymptomMatcher::default();
/// let matches = matcher.rank("fever, cough", &diseases, 0.5).unwrap();
/// assert_eq!(matches[0].disease.name, "Flu");
/// ```
pub struct SymptomMatcher {
    similarity: Box<dyn StringSimilarity>,
    token_cutoff: f64,
}

impl Default for SymptomMatcher {
    fn default() -> Self {
        Self { similarity: Box::new(IndelRatio), token_cutoff: DEFAULT_TOKEN_CUTOFF }
    }
}

impl std::fmt::Debug for SymptomMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymptomMatcher")
            .field("similarity", &self.similarity.name())
            .field("token_cutoff", &self.token_cutoff)
            .finish()
    }
}

impl SymptomMatcher {
    /// Create a matcher with the given similarity measure and per-token cut-off.
    ///
    /// # Errors
    ///
    /// Returns [`HealthbotError::InvalidArgument`] if `token_cutoff` is not in `[0, 1]`.
    pub fn new(similarity: Box<dyn StringSimilarity>, token_cutoff: f64) -> Result<Self> {
        check_unit_interval("token_cutoff", token_cutoff)?;
        Ok(Self { similarity, token_cutoff })
    }

    pub fn token_cutoff(&self) -> f64 {
        self.token_cutoff
    }

    /// Score of one disease against already normalized query tokens.
    pub fn score(&self, tokens: &[String], disease: &DiseaseRecord) -> f64 {
        if tokens.is_empty() || disease.symptoms.is_empty() {
            return 0.0;
        }
        let matched = disease
            .symptoms
            .iter()
            .filter(|symptom| {
                tokens
                    .iter()
                    .any(|token| self.similarity.similarity(symptom, token) > self.token_cutoff)
            })
            .count();
        matched as f64 / disease.symptoms.len() as f64
    }

    /// Rank `diseases` against a comma-separated symptom `query`.
    ///
    /// Diseases scoring at least `threshold` are returned by descending score;
    /// equal scores keep table order.
    ///
    /// # Errors
    ///
    /// Returns [`HealthbotError::InvalidArgument`] if `threshold` is not in `[0, 1]`.
    pub fn rank<'a>(
        &self,
        query: &str,
        diseases: &'a [DiseaseRecord],
        threshold: f64,
    ) -> Result<Vec<MatchResult<'a>>> {
        check_unit_interval("threshold", threshold)?;

        let tokens = parse_symptom_list(query);
        let mut matches: Vec<MatchResult<'a>> = diseases
            .iter()
            .map(|disease| MatchResult { disease, score: self.score(&tokens, disease) })
            .filter(|m| m.score >= threshold)
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            token_count = tokens.len(),
            match_count = matches.len(),
            similarity = self.similarity.name(),
            "ranked diseases"
        );
        Ok(matches)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HealthbotError::InvalidArgument(format!("{name} must be within [0, 1], got {value}")))
    }
}
