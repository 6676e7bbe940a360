//! Golden tests for symptom extraction.
//!
//! These tests verify the found-symptom set against known phrasings.

use std::collections::BTreeMap;

use symptom_triage_core::extractor::FeatureExtractor;
use symptom_triage_core::models::FeatureSchema;

const SYMPTOMS: &[&str] = &[
    "itching",
    "skin_rash",
    "nodal_skin_eruptions",
    "continuous_sneezing",
    "shivering",
    "chills",
    "joint_pain",
    "stomach_pain",
    "acidity",
    "vomiting",
    "burning_micturition",
    "fatigue",
    "anxiety",
    "cough",
    "high_fever",
    "breathlessness",
    "sweating",
    "indigestion",
    "headache",
    "dark_urine",
    "nausea",
    "loss_of_appetite",
    "back_pain",
    "constipation",
    "abdominal_pain",
    "diarrhoea",
    "mild_fever",
    "throat_irritation",
    "chest_pain",
    "weakness_in_limbs",
    "fast_heart_rate",
    "dizziness",
    "knee_pain",
    "loss_of_balance",
    "red_spots_over_body",
    "depression",
    "irritability",
];

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    text: &'static str,
    expected_present: &'static [&'static str],
    expected_absent: &'static [&'static str],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "vomiting-nausea-mild-fever",
            text: "I have been vomiting and feeling nauseous with a mild fever",
            expected_present: &["vomiting", "nausea", "mild_fever"],
            expected_absent: &["chest_pain"],
        },
        GoldenCase {
            id: "weak-limbs-dizzy",
            text: "I feel weakness in my limbs and dizziness",
            expected_present: &["weakness_in_limbs", "dizziness"],
            expected_absent: &["vomiting"],
        },
        GoldenCase {
            id: "negated-vomiting",
            text: "No vomiting, but I have a sore throat and cough",
            expected_present: &["throat_irritation", "cough"],
            expected_absent: &["vomiting"],
        },
        GoldenCase {
            id: "itchy-rashes",
            text: "I have itchy rashes and red spots on my skin",
            expected_present: &["itching", "skin_rash"],
            expected_absent: &["cough"],
        },
        GoldenCase {
            id: "skin-rash-direct",
            text: "skin rash",
            expected_present: &["skin_rash"],
            expected_absent: &[],
        },
        GoldenCase {
            id: "fever-joint-pain-no-chest-pain",
            text: "I have had fever and severe joint pain for two days. No chest pain.",
            expected_present: &["high_fever", "joint_pain"],
            expected_absent: &["chest_pain"],
        },
        GoldenCase {
            id: "misspelled-headache",
            text: "hedache since morning",
            expected_present: &["headache"],
            expected_absent: &[],
        },
        GoldenCase {
            id: "knees-hurt",
            text: "My knees hurt when I climb stairs",
            expected_present: &["knee_pain"],
            expected_absent: &["chest_pain"],
        },
        GoldenCase {
            id: "burning-urination",
            text: "There is burning during urination",
            expected_present: &["burning_micturition"],
            expected_absent: &[],
        },
        GoldenCase {
            id: "lightheaded-exhausted",
            text: "Lightheaded and exhausted all week",
            expected_present: &["dizziness", "fatigue"],
            expected_absent: &[],
        },
    ]
}

fn extractor() -> FeatureExtractor {
    let schema = FeatureSchema::new(SYMPTOMS.iter().map(|s| s.to_string()).collect()).unwrap();
    FeatureExtractor::new(schema, &BTreeMap::new()).unwrap()
}

#[test]
fn test_golden_extraction() {
    let extractor = extractor();

    for case in get_golden_cases() {
        let result = extractor.extract(case.text).unwrap();

        for symptom in case.expected_present {
            assert!(
                result.contains(symptom),
                "[{}] expected '{}' in {:?}",
                case.id,
                symptom,
                result.keys
            );
        }
        for symptom in case.expected_absent {
            assert!(
                !result.contains(symptom),
                "[{}] did not expect '{}' in {:?}",
                case.id,
                symptom,
                result.keys
            );
        }
    }
}

#[test]
fn test_golden_vectors_align_with_schema() {
    let extractor = extractor();

    for case in get_golden_cases() {
        let result = extractor.extract(case.text).unwrap();
        assert_eq!(result.vector.len(), SYMPTOMS.len(), "[{}]", case.id);

        for (i, symptom) in SYMPTOMS.iter().enumerate() {
            let active = result.vector.get(i) == Some(1);
            assert_eq!(active, result.contains(symptom), "[{}] {}", case.id, symptom);
        }
    }
}

#[test]
fn test_every_schema_id_has_synonyms() {
    let extractor = extractor();

    for symptom in SYMPTOMS {
        let phrases = extractor.synonyms().get(symptom);
        assert!(
            phrases.map_or(false, |p| !p.is_empty()),
            "'{}' has no synonyms",
            symptom
        );
    }
}

#[test]
fn test_seed_phrases_extend_detection() {
    let schema = FeatureSchema::new(SYMPTOMS.iter().map(|s| s.to_string()).collect()).unwrap();
    let mut seed = BTreeMap::new();
    seed.insert(
        "continuous_sneezing".to_string(),
        vec!["Can't Stop Sneezing!".to_string()],
    );
    let extractor = FeatureExtractor::new(schema, &seed).unwrap();

    let result = extractor.extract("I can't stop sneezing since yesterday").unwrap();
    assert!(result.contains("continuous_sneezing"), "{:?}", result.keys);
}

#[test]
fn test_empty_text_yields_zero_vector() {
    let result = extractor().extract("").unwrap();

    assert!(result.is_empty());
    assert_eq!(result.active_count(), 0);
    assert_eq!(result.vector.len(), SYMPTOMS.len());
}
