//! Symptom feature extraction from free text.
//!
//! Pipeline: Normalize → Heuristics → Synonyms (loose, strict) → Fuzzy →
//! Direct tokens → Negation
//!
//! Every pass before negation only adds to the found set. Negation runs last
//! and is the only pass that removes.

mod fuzzy;
mod heuristics;
mod normalizer;
mod synonyms;

pub use fuzzy::*;
pub use heuristics::*;
pub use normalizer::*;
pub use synonyms::*;

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::{ExtractionResult, FeatureSchema};

/// The fuzzy pass only runs while fewer than this many symptoms are found.
pub const FUZZY_GATE: usize = 6;

/// Extractor errors.
#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Feature vector has {actual} entries, schema has {expected}")]
    VectorLength { expected: usize, actual: usize },
}

pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// A synonym phrase with its word-boundary pattern.
#[derive(Debug, Clone)]
struct PhrasePattern {
    symptom: String,
    phrase: String,
    strict: Regex,
}

/// Patterns built from a symptom id spelled out as words.
#[derive(Debug, Clone)]
struct TokenPattern {
    symptom: String,
    direct: Regex,
    negated: Regex,
}

/// Turns symptom text into a found-symptom set and schema-aligned vector.
///
/// Built once at startup; all patterns are compiled up front.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    schema: FeatureSchema,
    synonyms: SynonymTable,
    heuristics: HeuristicRules,
    phrases: Vec<PhrasePattern>,
    tokens: Vec<TokenPattern>,
}

impl FeatureExtractor {
    /// Build the extractor from a schema and the synonym seed.
    pub fn new(
        schema: FeatureSchema,
        seed: &BTreeMap<String, Vec<String>>,
    ) -> ExtractorResult<Self> {
        let synonyms = SynonymTable::build(&schema, seed);
        let heuristics = HeuristicRules::for_schema(&schema)?;
        Self::with_parts(schema, synonyms, heuristics)
    }

    /// Build from an explicit synonym table and rule set.
    pub fn with_parts(
        schema: FeatureSchema,
        synonyms: SynonymTable,
        heuristics: HeuristicRules,
    ) -> ExtractorResult<Self> {
        let mut phrases = Vec::with_capacity(synonyms.phrase_count());
        let mut tokens = Vec::with_capacity(schema.len());

        for (symptom, symptom_phrases) in synonyms.iter() {
            if !schema.contains(symptom) {
                debug!(symptom = %symptom, "synonym id not in schema, ignored");
                continue;
            }
            for phrase in symptom_phrases {
                phrases.push(PhrasePattern {
                    symptom: symptom.to_string(),
                    phrase: phrase.clone(),
                    strict: word_pattern(phrase)?,
                });
            }
        }

        for symptom in schema.symptoms() {
            let token = normalize(symptom);
            if token.is_empty() {
                continue;
            }
            tokens.push(TokenPattern {
                symptom: symptom.clone(),
                direct: word_pattern(&token)?,
                negated: Regex::new(&format!(
                    r"\b(no|not|without|never)\s+{}\b",
                    regex::escape(&token)
                ))?,
            });
        }

        debug!(
            symptoms = schema.len(),
            phrases = phrases.len(),
            rules = heuristics.len(),
            "Feature extractor ready"
        );

        Ok(Self {
            schema,
            synonyms,
            heuristics,
            phrases,
            tokens,
        })
    }

    /// Extract symptoms from free text.
    pub fn extract(&self, text: &str) -> ExtractorResult<ExtractionResult> {
        let text = normalize(text);
        let mut found = BTreeSet::new();

        self.heuristic_pass(&text, &mut found);
        self.loose_synonym_pass(&text, &mut found);
        self.strict_synonym_pass(&text, &mut found);
        if found.len() < FUZZY_GATE {
            self.fuzzy_pass(&text, &mut found);
        }
        self.direct_token_pass(&text, &mut found);
        self.negation_pass(&text, &mut found);

        let vector = self.schema.vectorize(&found);
        if vector.len() != self.schema.len() {
            return Err(ExtractorError::VectorLength {
                expected: self.schema.len(),
                actual: vector.len(),
            });
        }

        Ok(ExtractionResult {
            keys: found.into_iter().collect(),
            vector,
        })
    }

    /// Add ids whose hand-tuned patterns fire.
    fn heuristic_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        let before = found.len();
        found.extend(self.heuristics.detect(text).map(String::from));
        debug!(added = found.len() - before, "heuristic pass");
    }

    /// Space-delimited containment check, may over-match inside longer phrases.
    fn loose_synonym_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        let before = found.len();
        let padded = format!(" {text} ");
        for p in &self.phrases {
            if found.contains(&p.symptom) {
                continue;
            }
            if padded.contains(&format!(" {} ", p.phrase))
                || text.starts_with(&format!("{} ", p.phrase))
                || text.ends_with(&format!(" {}", p.phrase))
            {
                found.insert(p.symptom.clone());
            }
        }
        debug!(added = found.len() - before, "loose synonym pass");
    }

    /// Word-boundary regex check. Subsumes the loose pass on normalized text.
    fn strict_synonym_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        let before = found.len();
        for p in &self.phrases {
            if !found.contains(&p.symptom) && p.strict.is_match(text) {
                found.insert(p.symptom.clone());
            }
        }
        debug!(added = found.len() - before, "strict synonym pass");
    }

    /// Approximate match of every phrase against token n-grams.
    fn fuzzy_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        if text.is_empty() {
            return;
        }
        let before = found.len();
        let windows = candidate_windows(text);
        for p in &self.phrases {
            if !found.contains(&p.symptom) && phrase_matches(text, &windows, &p.phrase) {
                found.insert(p.symptom.clone());
            }
        }
        debug!(added = found.len() - before, "fuzzy pass");
    }

    /// Schema ids spelled out verbatim in the text.
    fn direct_token_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        let before = found.len();
        for t in &self.tokens {
            if !found.contains(&t.symptom) && t.direct.is_match(text) {
                found.insert(t.symptom.clone());
            }
        }
        debug!(added = found.len() - before, "direct token pass");
    }

    /// Drop ids preceded by no/not/without/never.
    fn negation_pass(&self, text: &str, found: &mut BTreeSet<String>) {
        for t in &self.tokens {
            if found.contains(&t.symptom) && t.negated.is_match(text) {
                debug!(symptom = %t.symptom, "negated");
                found.remove(&t.symptom);
            }
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn heuristics(&self) -> &HeuristicRules {
        &self.heuristics
    }
}

/// `\b<phrase>\b` with the phrase escaped.
fn word_pattern(phrase: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"\b{}\b", regex::escape(phrase)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn extractor(ids: &[&str]) -> FeatureExtractor {
        let schema = FeatureSchema::new(ids.iter().map(|s| s.to_string()).collect()).unwrap();
        FeatureExtractor::new(schema, &BTreeMap::new()).unwrap()
    }

    /// Shared across tests, building it compiles every pattern.
    fn clinical() -> &'static FeatureExtractor {
        static CLINICAL: OnceLock<FeatureExtractor> = OnceLock::new();
        CLINICAL.get_or_init(|| {
            extractor(&[
                "itching",
                "skin_rash",
                "chills",
                "joint_pain",
                "vomiting",
                "fatigue",
                "cough",
                "high_fever",
                "mild_fever",
                "headache",
                "nausea",
                "chest_pain",
                "dizziness",
                "knee_pain",
                "weakness_in_limbs",
            ])
        })
    }

    #[test]
    fn test_fever_and_joint_pain_with_negated_chest_pain() {
        let result = clinical()
            .extract("I have had fever and severe joint pain for two days. No chest pain.")
            .unwrap();

        assert!(result.contains("high_fever") || result.contains("mild_fever"));
        assert!(result.contains("joint_pain"));
        assert!(!result.contains("chest_pain"));
    }

    #[test]
    fn test_negation_law() {
        let ex = clinical();
        for prefix in ["no", "not", "without", "never"] {
            let result = ex.extract(&format!("{prefix} chest pain")).unwrap();
            assert!(!result.contains("chest_pain"), "{prefix} chest pain kept chest_pain");
        }

        let kept = ex.extract("crushing chest pain").unwrap();
        assert!(kept.contains("chest_pain"));
    }

    #[test]
    fn test_empty_text() {
        let ex = clinical();
        for text in ["", "   ", "?!"] {
            let result = ex.extract(text).unwrap();
            assert!(result.is_empty());
            assert_eq!(result.vector.len(), ex.schema().len());
            assert_eq!(result.active_count(), 0);
        }
    }

    #[test]
    fn test_direct_token_without_synonyms() {
        let schema = FeatureSchema::new(vec!["skin_rash".into(), "cough".into()]).unwrap();
        let ex = FeatureExtractor::with_parts(
            schema,
            SynonymTable::default(),
            HeuristicRules::default(),
        )
        .unwrap();

        let result = ex.extract("skin rash").unwrap();
        assert_eq!(result.keys, vec!["skin_rash"]);
        assert_eq!(result.vector.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_fuzzy_typo() {
        let result = clinical().extract("I get a terrible hedache").unwrap();
        assert!(result.contains("headache"));
    }

    #[test]
    fn test_fuzzy_rejects_near_word() {
        let result = clinical().extract("I fell asleep on the couch").unwrap();
        assert!(!result.contains("cough"));
    }

    #[test]
    fn test_fuzzy_gate_skips_typo_when_many_found() {
        let result = clinical()
            .extract("vomiting, itching, cough, chills, fatigue, dizziness and a hedache")
            .unwrap();

        assert!(result.keys.len() >= FUZZY_GATE);
        assert!(!result.contains("headache"));
    }

    #[test]
    fn test_fuzzy_gate_allows_typo_when_few_found() {
        let result = clinical().extract("itching and a hedache").unwrap();

        assert!(result.keys.len() < FUZZY_GATE);
        assert!(result.contains("itching"));
        assert!(result.contains("headache"));
    }

    #[test]
    fn test_unknown_words_ignored() {
        let result = clinical().extract("quantum chromodynamics").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_keys_sorted_and_vector_aligned() {
        let ex = clinical();
        let result = ex.extract("vomiting, itching and a cough").unwrap();

        let mut sorted = result.keys.clone();
        sorted.sort();
        assert_eq!(result.keys, sorted);

        for (i, symptom) in ex.schema().symptoms().iter().enumerate() {
            assert_eq!(result.vector.get(i) == Some(1), result.contains(symptom));
        }
    }

    #[test]
    fn test_seed_synonym_outside_schema() {
        let schema = FeatureSchema::new(vec!["cough".into()]).unwrap();
        let mut seed = BTreeMap::new();
        seed.insert("wheezing".to_string(), vec!["whistling breath".to_string()]);
        let ex = FeatureExtractor::new(schema, &seed).unwrap();

        assert!(ex.synonyms().get("wheezing").is_none());
        let result = ex.extract("whistling breath at night").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.keys.len(), result.active_count());
    }

    proptest! {
        #[test]
        fn prop_vector_matches_schema(text in "[a-zA-Z ,.!]{0,60}") {
            let ex = clinical();
            let result = ex.extract(&text).unwrap();

            prop_assert_eq!(result.vector.len(), ex.schema().len());
            for (i, symptom) in ex.schema().symptoms().iter().enumerate() {
                prop_assert_eq!(result.vector.get(i) == Some(1), result.contains(symptom));
            }
        }
    }
}
