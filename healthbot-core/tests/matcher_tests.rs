//! Symptom matching and doctor lookup scenarios.

use healthbot_core::{
    DiseaseRecord, DoctorRecord, JaroWinkler, LevenshteinRatio, SymptomMatcher, recommend,
};
use proptest::prelude::*;

fn table() -> Vec<DiseaseRecord> {
    vec![
        DiseaseRecord::new(
            "Flu",
            ["fever", "cough", "fatigue"],
            "Viral infection.",
            "Paracetamol",
            "Rest",
        ),
        DiseaseRecord::new(
            "Migraine",
            ["headache", "nausea"],
            "Recurring headaches.",
            "Ibuprofen",
            "See a neurologist",
        ),
        DiseaseRecord::new("Unknown", Vec::<String>::new(), "", "", ""),
        DiseaseRecord::new("Flu", ["fever"], "Duplicate entry.", "", ""),
    ]
}

#[test]
fn fever_and_cough_match_flu_with_two_thirds() {
    let table = table();
    let matches = SymptomMatcher::default().rank("fever, cough", &table, 0.5).unwrap();

    let flu = matches.iter().find(|m| m.disease.description == "Viral infection.").unwrap();
    assert!((flu.score - 2.0 / 3.0).abs() < 1e-9);
    assert!(matches.iter().all(|m| m.disease.name != "Migraine"));
}

#[test]
fn qualified_symptoms_still_match_by_default() {
    let flu = vec![DiseaseRecord::new("Flu", ["fever", "cough", "fatigue"], "", "", "")];
    let matches = SymptomMatcher::default().rank("high fever, dry cough", &flu, 0.5).unwrap();
    assert_eq!(matches.len(), 1);
    assert!((matches[0].score - 2.0 / 3.0).abs() < 1e-9);

    let strict = SymptomMatcher::new(Box::new(LevenshteinRatio), 0.6).unwrap();
    assert!(strict.rank("high fever, dry cough", &flu, 0.5).unwrap().is_empty());
}

#[test]
fn duplicate_disease_names_are_both_kept() {
    let table = table();
    let matches = SymptomMatcher::default().rank("Fever ,COUGH", &table, 0.5).unwrap();
    let names: Vec<&str> = matches.iter().map(|m| m.disease.name.as_str()).collect();
    assert_eq!(names, vec!["Flu", "Flu"]);
    assert_eq!(matches[0].score, 1.0);
    assert_eq!(matches[0].disease.description, "Duplicate entry.");
}

#[test]
fn alternate_similarity_plugs_into_the_matcher() {
    let table = table();
    let matcher = SymptomMatcher::new(Box::new(JaroWinkler), 0.6).unwrap();
    let matches = matcher.rank("headake, nausea", &table, 0.5).unwrap();
    assert_eq!(matches[0].disease.name, "Migraine");
}

#[test]
fn doctor_lookup_is_case_insensitive() {
    let doctors = vec![DoctorRecord {
        name: "Dr. A".into(),
        specialty: "General Physician".into(),
        hospital: "City Hospital".into(),
        contact: "555-0100".into(),
        treatable_diseases: vec!["flu".into(), "cold".into()],
    }];
    let upper: Vec<&str> = recommend("Flu", &doctors).iter().map(|d| d.name.as_str()).collect();
    let lower: Vec<&str> = recommend("flu", &doctors).iter().map(|d| d.name.as_str()).collect();
    assert_eq!(upper, vec!["Dr. A"]);
    assert_eq!(lower, upper);
}

fn arb_symptom() -> impl Strategy<Value = String> {
    let symptoms =
        vec!["fever", "cough", "fatigue", "headache", "nausea", "rash", "chills", "sore throat"];
    prop::sample::select(symptoms).prop_map(str::to_string)
}

fn arb_table() -> impl Strategy<Value = Vec<DiseaseRecord>> {
    prop::collection::vec(prop::collection::vec(arb_symptom(), 0..5), 1..12).prop_map(|lists| {
        lists
            .into_iter()
            .enumerate()
            .map(|(i, symptoms)| DiseaseRecord::new(format!("disease-{i}"), symptoms, "", "", ""))
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_symptom(), 0..4).prop_map(|tokens| tokens.join(", "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Results are sorted by non-increasing score and respect the threshold.
    #[test]
    fn prop_results_sorted_and_above_threshold(
        table in arb_table(),
        query in arb_query(),
        threshold in 0.0f64..=1.0,
    ) {
        let matches = SymptomMatcher::default().rank(&query, &table, threshold).unwrap();
        for pair in matches.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for m in &matches {
            prop_assert!(m.score >= threshold);
            prop_assert!((0.0..=1.0).contains(&m.score));
        }
    }

    /// A disease without symptoms never matches when the threshold is positive.
    #[test]
    fn prop_empty_symptom_list_never_matches(
        table in arb_table(),
        query in arb_query(),
        threshold in 0.01f64..=1.0,
    ) {
        let matches = SymptomMatcher::default().rank(&query, &table, threshold).unwrap();
        prop_assert!(matches.iter().all(|m| !m.disease.symptoms.is_empty()));
    }

    /// Looking up any disease in an empty directory yields nothing.
    #[test]
    fn prop_recommend_from_empty_directory(name in ".*") {
        prop_assert!(recommend(&name, &[]).is_empty());
    }
}
