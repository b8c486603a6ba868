//! Reply assembly.
//!
//! [`assemble`] is a pure function: it formats whatever the matcher,
//! the retrieval pipeline and the web search produced into one text block.
//! Each line is a separate part and parts are joined by a blank line, in a
//! fixed order: condition and doctor entries, retrieved knowledge, web
//! results, then [`DISCLAIMER`].

use std::fmt;

use healthbot_rag::{first_sentence, truncate};
use serde::{Deserialize, Serialize};

use crate::knowledge::DoctorRecord;
use crate::matcher::MatchResult;

/// Safety notice closing every reply.
pub const DISCLAIMER: &str = concat!(
    "⚠️ *This information is for educational purposes only. ",
    "Please consult a licensed doctor for medical advice.*"
);

/// Entries kept from the knowledge and web blocks in [`ResponseMode::Concise`].
pub const CONCISE_ENTRY_LIMIT: usize = 3;

/// Characters kept from each retrieved document in [`ResponseMode::Detailed`].
pub const DETAILED_DOCUMENT_LIMIT: usize = 500;

const PART_SEPARATOR: &str = "\n\n";

/// How much detail a reply carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    #[default]
    Concise,
    Detailed,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concise => f.write_str("concise"),
            Self::Detailed => f.write_str("detailed"),
        }
    }
}

/// Format a complete reply.
///
/// `doctors_for` is called once per match with the disease name. `web_results`
/// is `None` when web search was not requested; an empty `Some` list, like an
/// empty `retrieved` list, simply produces no block.
pub fn assemble<'d, F>(
    matches: &[MatchResult<'_>],
    doctors_for: F,
    retrieved: &[String],
    web_results: Option<&[String]>,
    mode: ResponseMode,
) -> String
where
    F: Fn(&str) -> Vec<&'d DoctorRecord>,
{
    let mut parts: Vec<String> = Vec::new();

    for m in matches {
        let disease = m.disease;
        match mode {
            ResponseMode::Detailed => {
                parts.push(format!("🦠 **Possible Condition**: {}", disease.name));
                parts.push(format!("📖 {}", disease.description));
                parts.push(format!("💊 Suggested (general): {}", disease.medicines));
                parts.push(format!("👨‍⚕️ Advice: {}", disease.consultation_advice));
            }
            ResponseMode::Concise => {
                parts.push(format!("🦠 {} - {}", disease.name, disease.consultation_advice));
            }
        }

        let doctors = doctors_for(&disease.name);
        if doctors.is_empty() {
            parts.push("👨‍⚕️ Doctor: No specialist found for this condition.".to_string());
        }
        for doctor in doctors {
            parts.push(match mode {
                ResponseMode::Detailed => format!(
                    "👨‍⚕️ **Doctor Recommendation**: {} ({})\n🏥 {}\n📞 {}",
                    doctor.name, doctor.specialty, doctor.hospital, doctor.contact
                ),
                ResponseMode::Concise => {
                    format!("👨‍⚕️ Doctor: {} ({})", doctor.name, doctor.specialty)
                }
            });
        }
    }

    if !retrieved.is_empty() {
        match mode {
            ResponseMode::Detailed => {
                parts.push("📚 **Related Knowledge:**".to_string());
                parts.extend(
                    retrieved
                        .iter()
                        .map(|doc| format!("- {}", truncate(doc, DETAILED_DOCUMENT_LIMIT))),
                );
            }
            ResponseMode::Concise => {
                parts.push("📚 Related Knowledge:".to_string());
                parts.extend(
                    retrieved
                        .iter()
                        .take(CONCISE_ENTRY_LIMIT)
                        .map(|doc| format!("- {}", first_sentence(doc))),
                );
            }
        }
    }

    if let Some(results) = web_results.filter(|r| !r.is_empty()) {
        let (header, limit) = match mode {
            ResponseMode::Detailed => ("🌐 **Web Search Results:**", results.len()),
            ResponseMode::Concise => ("🌐 Web Search Results:", CONCISE_ENTRY_LIMIT),
        };
        parts.push(header.to_string());
        parts.extend(results.iter().take(limit).map(|r| format!("- {r}")));
    }

    parts.push(DISCLAIMER.to_string());
    parts.join(PART_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::DiseaseRecord;

    fn flu() -> DiseaseRecord {
        let symptoms = ["fever", "cough"];
        DiseaseRecord::new("Flu", symptoms, "A viral infection.", "Paracetamol", "Rest and fluids")
    }

    fn no_doctors(_: &str) -> Vec<&'static DoctorRecord> {
        Vec::new()
    }

    #[test]
    fn empty_inputs_produce_only_the_disclaimer() {
        assert_eq!(assemble(&[], no_doctors, &[], None, ResponseMode::Concise), DISCLAIMER);
        let no_web: &[String] = &[];
        let detailed = assemble(&[], no_doctors, &[], Some(no_web), ResponseMode::Detailed);
        assert_eq!(detailed, DISCLAIMER);
    }

    #[test]
    fn concise_condition_without_doctor() {
        let disease = flu();
        let matches = [MatchResult { disease: &disease, score: 1.0 }];
        let text = assemble(&matches, no_doctors, &[], None, ResponseMode::Concise);
        assert_eq!(
            text,
            format!(
                "🦠 Flu - Rest and fluids\n\n\
                 👨‍⚕️ Doctor: No specialist found for this condition.\n\n{DISCLAIMER}"
            )
        );
    }

    #[test]
    fn detailed_condition_with_doctor() {
        let disease = flu();
        let doctor = DoctorRecord {
            name: "Dr. A".into(),
            specialty: "GP".into(),
            hospital: "City".into(),
            contact: "555".into(),
            treatable_diseases: vec!["flu".into()],
        };
        let doctors = [doctor];
        let matches = [MatchResult { disease: &disease, score: 1.0 }];
        let text =
            assemble(&matches, |_| doctors.iter().collect(), &[], None, ResponseMode::Detailed);
        let parts: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(
            parts,
            vec![
                "🦠 **Possible Condition**: Flu",
                "📖 A viral infection.",
                "💊 Suggested (general): Paracetamol",
                "👨‍⚕️ Advice: Rest and fluids",
                "👨‍⚕️ **Doctor Recommendation**: Dr. A (GP)\n🏥 City\n📞 555",
                DISCLAIMER,
            ]
        );
    }

    #[test]
    fn concise_knowledge_uses_first_sentence() {
        let docs = vec!["Fever is common. It passes.".to_string()];
        let text = assemble(&[], no_doctors, &docs, None, ResponseMode::Concise);
        assert!(text.starts_with("📚 Related Knowledge:\n\n- Fever is common.\n\n"));
    }

    #[test]
    fn mode_display_matches_config_spelling() {
        assert_eq!(ResponseMode::Concise.to_string(), "concise");
        let detailed = serde_json::to_string(&ResponseMode::Detailed).unwrap();
        assert_eq!(detailed, format!("\"{}\"", ResponseMode::Detailed));
    }
}
