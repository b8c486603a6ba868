//! String similarity measures used by the symptom matcher.
//!
//! The matcher only depends on [`StringSimilarity`], so the measure can be
//! swapped (through [`SimilarityKind`] in the configuration) without touching
//! the scoring logic.

use serde::{Deserialize, Serialize};

/// A symmetric similarity between two strings in `[0, 1]`, where identical
/// strings score `1.0`.
pub trait StringSimilarity: Send + Sync {
    /// Similarity of `a` and `b`.
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// `2 * lcs(a, b) / (len(a) + len(b))`, counted in characters, where `lcs` is
/// the length of the longest common subsequence.
///
/// Only insertions and deletions are charged, so a symptom embedded in a
/// longer phrase ("fever" in "high fever") keeps a high score.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl StringSimilarity for IndelRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let total = a.len() + b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * longest_common_subsequence(&a, &b) as f64 / total as f64
    }

    fn name(&self) -> &'static str {
        "indel"
    }
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`, counted in characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinRatio;

impl StringSimilarity for LevenshteinRatio {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 1.0;
        }
        1.0 - levenshtein(&a, &b) as f64 / longest as f64
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Jaro-Winkler similarity with the standard prefix scale of 0.1 over at most
/// four leading characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

impl StringSimilarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let jaro = jaro(&a, &b);
        let prefix = a.iter().zip(&b).take(4).take_while(|(x, y)| x == y).count();
        jaro + prefix as f64 * 0.1 * (1.0 - jaro)
    }

    fn name(&self) -> &'static str {
        "jaro-winkler"
    }
}

/// Configurable choice of [`StringSimilarity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimilarityKind {
    #[default]
    Indel,
    Levenshtein,
    JaroWinkler,
}

impl SimilarityKind {
    /// Instantiate the selected measure.
    pub fn build(self) -> Box<dyn StringSimilarity> {
        match self {
            Self::Indel => Box::new(IndelRatio),
            Self::Levenshtein => Box::new(LevenshteinRatio),
            Self::JaroWinkler => Box::new(JaroWinkler),
        }
    }
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for ca in a {
        let mut diagonal = 0;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb { diagonal + 1 } else { above.max(row[j]) };
            diagonal = above;
        }
    }
    row[b.len()]
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count() / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn indel_ratio_rewards_embedded_symptoms() {
        let sim = IndelRatio;
        assert!(approx(sim.similarity("fever", "high fever"), 2.0 / 3.0));
        assert!(approx(sim.similarity("cough", "dry cough"), 10.0 / 14.0));
        let edit_ratio = LevenshteinRatio.similarity("fever", "high fever");
        assert!(sim.similarity("fever", "high fever") > edit_ratio);
        assert_eq!(sim.similarity("rash", "rash"), 1.0);
        assert_eq!(sim.similarity("", ""), 1.0);
        assert_eq!(sim.similarity("", "cough"), 0.0);
        assert_eq!(sim.similarity("nausea", "sneezing"), sim.similarity("sneezing", "nausea"));
    }

    #[test]
    fn longest_common_subsequence_known_values() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(longest_common_subsequence(&chars("abcbdab"), &chars("bdcaba")), 4);
        assert_eq!(longest_common_subsequence(&chars("fatigue"), &chars("fever")), 2);
        assert_eq!(longest_common_subsequence(&chars(""), &chars("abc")), 0);
    }

    #[test]
    fn levenshtein_distance_known_values() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
    }

    #[test]
    fn levenshtein_ratio_is_one_for_identical_and_symmetric() {
        let sim = LevenshteinRatio;
        assert_eq!(sim.similarity("fever", "fever"), 1.0);
        assert_eq!(sim.similarity("", ""), 1.0);
        let forward = sim.similarity("headache", "headaches");
        assert_eq!(forward, sim.similarity("headaches", "headache"));
        assert!(approx(sim.similarity("headache", "headaches"), 8.0 / 9.0));
        assert_eq!(sim.similarity("", "cough"), 0.0);
    }

    #[test]
    fn jaro_winkler_known_values() {
        let sim = JaroWinkler;
        assert!(approx(sim.similarity("martha", "marhta"), 0.961));
        assert!(approx(sim.similarity("dixon", "dicksonx"), 0.813));
        assert_eq!(sim.similarity("cough", "cough"), 1.0);
        assert_eq!(sim.similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn kind_builds_named_measure() {
        assert_eq!(SimilarityKind::default(), SimilarityKind::Indel);
        assert_eq!(SimilarityKind::Indel.build().name(), "indel");
        assert_eq!(SimilarityKind::Levenshtein.build().name(), "levenshtein");
        assert_eq!(SimilarityKind::JaroWinkler.build().name(), "jaro-winkler");
    }
}
