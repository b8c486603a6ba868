//! The disease table and doctor directory.
//!
//! Both sources are loaded once at startup. Loading never aborts the process:
//! [`KnowledgeStore::load`] logs unreadable sources and substitutes an empty
//! collection, and malformed disease rows are skipped individually.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, warn};

use crate::error::{HealthbotError, Result};

/// One row of the disease table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub name: String,
    /// Lowercased, trimmed symptom names in source order, duplicates kept.
    pub symptoms: Vec<String>,
    pub description: String,
    pub medicines: String,
    pub consultation_advice: String,
}

impl DiseaseRecord {
    /// Create a record, normalizing the symptom list.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        symptoms: impl IntoIterator<Item = S>,
        description: impl Into<String>,
        medicines: impl Into<String>,
        consultation_advice: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symptoms: symptoms.into_iter().filter_map(|s| normalize_token(s.as_ref())).collect(),
            description: description.into(),
            medicines: medicines.into(),
            consultation_advice: consultation_advice.into(),
        }
    }
}

/// One entry of the doctor directory. Only `name` is required; missing or
/// `null` fields read as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hospital: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(rename = "diseases", default, deserialize_with = "null_as_default")]
    pub treatable_diseases: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DoctorRecord {
    /// Whether this doctor treats `disease`, ignoring case.
    pub fn treats(&self, disease: &str) -> bool {
        let wanted = disease.to_lowercase();
        self.treatable_diseases.iter().any(|d| d.to_lowercase() == wanted)
    }
}

/// Lowercase and trim a symptom token; `None` for blank tokens.
pub(crate) fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_lowercase();
    (!token.is_empty()).then_some(token)
}

/// Split a comma-separated symptom string into normalized tokens.
pub fn parse_symptom_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_token).collect()
}

/// Raw CSV row; every field optional so a short row is reported, not fatal.
#[derive(Debug, Deserialize)]
struct DiseaseRow {
    #[serde(rename = "Disease", default)]
    disease: Option<String>,
    #[serde(rename = "Symptoms", default)]
    symptoms: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Medicines", default)]
    medicines: Option<String>,
    #[serde(rename = "Consultation", default)]
    consultation: Option<String>,
}

/// Read the disease table from a CSV file with the header
/// `Disease,Symptoms,Description,Medicines,Consultation`.
///
/// Rows without a disease name, or that cannot be decoded, are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`HealthbotError::DataLoad`] if the file cannot be opened or its
/// header cannot be read.
pub fn load_diseases(path: &Path) -> Result<Vec<DiseaseRecord>> {
    let data_load =
        |message: String| HealthbotError::DataLoad { path: path.to_path_buf(), message };

    let file = File::open(path).map_err(|e| data_load(e.to_string()))?;
    let mut reader =
        csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(file);
    reader.headers().map_err(|e| data_load(e.to_string()))?;

    let mut diseases = Vec::new();
    for (line, row) in reader.deserialize::<DiseaseRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    row = line + 1,
                    error = %e,
                    "skipping malformed disease row"
                );
                continue;
            }
        };
        let Some(name) = row.disease.filter(|n| !n.trim().is_empty()) else {
            warn!(path = %path.display(), row = line + 1, "skipping disease row without a name");
            continue;
        };
        diseases.push(DiseaseRecord {
            name,
            symptoms: parse_symptom_list(row.symptoms.as_deref().unwrap_or_default()),
            description: row.description.unwrap_or_default(),
            medicines: row.medicines.unwrap_or_default(),
            consultation_advice: row.consultation.unwrap_or_default(),
        });
    }
    Ok(diseases)
}

/// Read the doctor directory from a JSON array.
///
/// Entries that do not decode as a [`DoctorRecord`] are skipped with a
/// warning; the rest of the directory is kept.
///
/// # Errors
///
/// Returns [`HealthbotError::DataLoad`] if the file cannot be read or is not a
/// JSON array.
pub fn load_doctors(path: &Path) -> Result<Vec<DoctorRecord>> {
    let data_load =
        |message: String| HealthbotError::DataLoad { path: path.to_path_buf(), message };
    let file = File::open(path).map_err(|e| data_load(e.to_string()))?;
    let entries: Vec<serde_json::Value> = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| data_load(e.to_string()))?;

    let mut doctors = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<DoctorRecord>(entry) {
            Ok(doctor) => doctors.push(doctor),
            Err(e) => {
                warn!(path = %path.display(), index, error = %e, "skipping malformed doctor entry");
            }
        }
    }
    Ok(doctors)
}

/// The disease table and doctor directory, in source order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    diseases: Vec<DiseaseRecord>,
    doctors: Vec<DoctorRecord>,
}

impl KnowledgeStore {
    /// Build a store from records already in memory. Diseases with a blank
    /// name are dropped.
    pub fn new(diseases: Vec<DiseaseRecord>, doctors: Vec<DoctorRecord>) -> Self {
        let diseases = diseases.into_iter().filter(|d| !d.name.trim().is_empty()).collect();
        Self { diseases, doctors }
    }

    /// Load both sources, substituting an empty collection for any source
    /// that cannot be read.
    pub fn load(medical_csv: &Path, doctors_json: &Path) -> Self {
        let diseases = load_diseases(medical_csv).unwrap_or_else(|e| {
            error!(error = %e, "disease table unavailable, continuing without it");
            Vec::new()
        });
        let doctors = load_doctors(doctors_json).unwrap_or_else(|e| {
            error!(error = %e, "doctor directory unavailable, continuing without it");
            Vec::new()
        });
        info!(
            disease_count = diseases.len(),
            doctor_count = doctors.len(),
            "loaded knowledge store"
        );
        Self::new(diseases, doctors)
    }

    pub fn diseases(&self) -> &[DiseaseRecord] {
        &self.diseases
    }

    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV: &str = "Disease,Symptoms,Description,Medicines,Consultation\n\
        Flu,\"Fever, Cough , fatigue\",Viral infection,Paracetamol,See a GP if it persists\n\
        ,\"rash\",Missing name,None,None\n\
        Cold,\"sneezing,,runny nose\",Mild infection,Rest,Usually self-limiting\n\
        Short row\n";

    #[test]
    fn loads_csv_and_normalizes_symptoms() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("medical.csv");
        fs::write(&path, CSV).unwrap();

        let diseases = load_diseases(&path).unwrap();
        let names: Vec<&str> = diseases.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Flu", "Cold", "Short row"]);
        assert_eq!(diseases[0].symptoms, vec!["fever", "cough", "fatigue"]);
        assert_eq!(diseases[0].consultation_advice, "See a GP if it persists");
        assert_eq!(diseases[1].symptoms, vec!["sneezing", "runny nose"]);
        assert!(diseases[2].symptoms.is_empty());
    }

    #[test]
    fn missing_sources_yield_empty_store() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::load(&temp.path().join("a.csv"), &temp.path().join("b.json"));
        assert!(store.diseases().is_empty());
        assert!(store.doctors().is_empty());
    }

    #[test]
    fn missing_csv_is_a_data_load_error() {
        let err = load_diseases(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, HealthbotError::DataLoad { .. }));
    }

    #[test]
    fn loads_doctors_with_optional_disease_list() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("doctors.json");
        fs::write(
            &path,
            r#"[
                {"name": "Dr. A", "specialty": "GP", "contact": "555", "diseases": ["Flu", "cold"]},
                {"name": "Dr. B", "specialty": "Dermatology", "hospital": "North", "contact": "556"}
            ]"#,
        )
        .unwrap();

        let doctors = load_doctors(&path).unwrap();
        assert_eq!(doctors.len(), 2);
        assert!(doctors[0].treats("flu"));
        assert!(doctors[0].treats("COLD"));
        assert!(!doctors[1].treats("flu"));
    }

    #[test]
    fn malformed_doctor_entries_are_skipped_individually() {
        let temp = tempfile::tempdir().unwrap();
        let doctors_json = temp.path().join("doctors.json");
        fs::write(
            &doctors_json,
            r#"[
                {"name": "Dr. A", "specialty": "GP", "contact": "555", "diseases": ["Flu"]},
                {"name": "Dr. C", "specialty": "ENT", "contact": null, "diseases": null},
                {"specialty": "Cardiology", "contact": "557"},
                "not a doctor"
            ]"#,
        )
        .unwrap();

        let store = KnowledgeStore::load(&temp.path().join("missing.csv"), &doctors_json);
        let names: Vec<&str> = store.doctors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. A", "Dr. C"]);
        assert_eq!(store.doctors()[1].contact, "");
        assert!(store.doctors()[1].treatable_diseases.is_empty());
        assert!(store.doctors()[0].treats("flu"));
    }

    #[test]
    fn invalid_doctor_json_is_a_data_load_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("doctors.json");
        fs::write(&path, "{\"name\": 1}").unwrap();
        assert!(matches!(load_doctors(&path), Err(HealthbotError::DataLoad { .. })));
    }

    #[test]
    fn store_drops_blank_disease_names() {
        let store = KnowledgeStore::new(
            vec![
                DiseaseRecord::new("  ", ["x"], "", "", ""),
                DiseaseRecord::new("Flu", [" Fever "], "", "", ""),
            ],
            Vec::new(),
        );
        assert_eq!(store.diseases().len(), 1);
        assert_eq!(store.diseases()[0].symptoms, vec!["fever"]);
    }
}
