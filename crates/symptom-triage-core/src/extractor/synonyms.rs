//! Synonym expansion and the effective synonym table.
//!
//! Every schema id gets layman paraphrases generated from its tokens, merged
//! with any phrases supplied in the synonym seed file.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use super::normalize;
use crate::models::FeatureSchema;

const PAIN_TOKEN: &str = "pain";

/// Fixed phrase sets added when an id contains one of the trigger substrings.
const TOPIC_PHRASES: &[(&[&str], &[&str])] = &[
    (
        &["fever"],
        &[
            "fever",
            "i have a fever",
            "high temperature",
            "temperature is",
            "feeling feverish",
            "feverish",
        ],
    ),
    (
        &["nausea", "vomit"],
        &["nausea", "i feel nauseous", "throwing up", "i vomited", "vomiting"],
    ),
    (
        &["cough"],
        &["cough", "i am coughing", "dry cough", "productive cough", "have a cough"],
    ),
    (
        &["headache"],
        &["headache", "my head hurts", "migraine", "head pain"],
    ),
    (
        &["dizziness", "vertigo"],
        &[
            "dizzy",
            "i feel dizzy",
            "vertigo",
            "spinning sensation",
            "i am unsteady",
            "can't keep balance",
        ],
    ),
    (
        &["rash", "itch", "skin"],
        &["rash", "skin rash", "itching", "itchy skin", "red spots", "red bumps"],
    ),
    (
        &["urine", "urination"],
        &[
            "urine",
            "peeing problem",
            "pain while urinating",
            "burn while peeing",
            "foul smelling urine",
        ],
    ),
];

/// Generate normalized paraphrases for a symptom id like `knee_pain`.
///
/// Output is a pure function of the id.
pub fn expand(symptom: &str) -> BTreeSet<String> {
    let parts: Vec<&str> = symptom.split('_').filter(|p| !p.is_empty()).collect();
    let joined = parts.join(" ");
    let mut variants = vec![joined.clone()];

    if symptom.ends_with(PAIN_TOKEN) {
        let base = if parts.len() > 1 {
            parts[..parts.len() - 1].join(" ")
        } else {
            joined.clone()
        };
        let base = base.trim();
        if !base.is_empty() {
            variants.push(format!("pain in my {base}"));
            variants.push(format!("{base} pain"));
            variants.push(format!("{base} ache"));
            variants.push(format!("ache in {base}"));
            variants.push(format!("my {base} hurts"));
            variants.push(format!("my {base} is hurting"));
        }
    } else if symptom.contains(PAIN_TOKEN) || symptom.contains("ache") {
        variants.push(format!("{joined} pain"));
        variants.push(format!("{joined} ache"));
    } else {
        variants.push(format!("have {joined}"));
        variants.push(format!("{joined} problem"));
        variants.push(format!("{joined} issue"));
    }

    // Plural / singular
    if joined.ends_with('s') {
        variants.push(joined.trim_end_matches('s').to_string());
    } else {
        variants.push(format!("{joined}s"));
    }

    for (triggers, phrases) in TOPIC_PHRASES {
        if triggers.iter().any(|t| symptom.contains(t)) {
            variants.extend(phrases.iter().map(|p| p.to_string()));
        }
    }

    variants
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}

/// Effective synonym phrases per symptom id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynonymTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl SynonymTable {
    /// Merge seed phrases with expander output for every schema id.
    ///
    /// Seed entries for ids outside the schema are dropped.
    pub fn build(schema: &FeatureSchema, seed: &BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::default();

        for (symptom, phrases) in seed {
            if !schema.contains(symptom) {
                warn!(symptom = %symptom, "Synonym seed id not in feature schema, skipping");
                continue;
            }
            for phrase in phrases {
                table.add_phrase(symptom, phrase);
            }
        }

        for symptom in schema.symptoms() {
            table
                .entries
                .entry(symptom.clone())
                .or_default()
                .extend(expand(symptom));
        }

        table
    }

    /// Add one phrase for a symptom. Blank phrases are ignored.
    pub fn add_phrase(&mut self, symptom: &str, phrase: &str) {
        let phrase = normalize(phrase);
        let entry = self.entries.entry(symptom.to_string()).or_default();
        if !phrase.is_empty() {
            entry.insert(phrase);
        }
    }

    /// Phrases for one symptom.
    pub fn get(&self, symptom: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(symptom)
    }

    /// All (symptom, phrases) pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total phrase count across all symptoms.
    pub fn phrase_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }
}
