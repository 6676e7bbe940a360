//! Hand-tuned regex cues for high-confidence symptom phrasings.
//!
//! Applied to normalized text before synonym matching. Rules are only
//! registered for ids present in the schema.

use regex::Regex;

use crate::models::FeatureSchema;

/// (symptom id, patterns). Patterns are compiled case-insensitive and searched unanchored.
const RULES: &[(&str, &[&str])] = &[
    // Fever
    (
        "high_fever",
        &[
            r"\b(high|very|really)\s+fever\b",
            r"\btemperature\s+(is|of|around)?\s*(1\d{2}|[89]\d)\b",
            r"\bfever(ish)?\b",
        ],
    ),
    (
        "mild_fever",
        &[r"\b(slight|low|mild)\s+fever\b", r"\b(a\s+)?fever\b"],
    ),
    // Pain
    (
        "knee_pain",
        &[
            r"\bknee\s+pain\b",
            r"\bpain\s+in\s+(my\s+)?knees?\b",
            r"\bmy\s+knees?\s+hurt\b",
        ],
    ),
    (
        "back_pain",
        &[r"\b(back|lower\s+back|spine)\s+pain\b", r"\bmy\s+back\s+hurts\b"],
    ),
    (
        "chest_pain",
        &[r"\bchest\s+pain\b", r"\bpain\s+in\s+(my\s+)?chest\b"],
    ),
    // Respiratory
    ("cough", &[r"\bcough(ing)?\b"]),
    ("throat_irritation", &[r"\bsore\s+throat\b"]),
    // GI
    ("vomiting", &[r"\bvomit(ing)?|throwing\s+up\b"]),
    ("nausea", &[r"\bnausea|nauseous|queasy\b"]),
    ("diarrhoea", &[r"\b(diarrhea|diarrhoea|loose\s+motions?)\b"]),
    // Neurological / general
    (
        "dizziness",
        &[r"\bdizzy|dizziness|lightheaded\b", r"\bvertigo\b"],
    ),
    ("fatigue", &[r"\bfatigue|tired|exhausted\b"]),
    (
        "weakness_in_limbs",
        &[r"\bweak(ness)?\s+(in|of)\s+(my\s+)?(legs|arms|limbs?)\b"],
    ),
    ("loss_of_balance", &[r"\bloss\s+of\s+balance|unsteady\b"]),
    // Skin
    ("skin_rash", &[r"\brash\b", r"\brashes\b"]),
    ("itching", &[r"\bitch(ing)?\b", r"\bitchy\b"]),
    // Urinary
    (
        "burning_micturition",
        &[
            r"\bburning\s+(while|during)?\s*urination\b",
            r"\bburn\s+while\s+peeing\b",
        ],
    ),
];

/// One symptom's compiled patterns.
#[derive(Debug, Clone)]
pub struct HeuristicRule {
    pub symptom: String,
    pub patterns: Vec<Regex>,
}

impl HeuristicRule {
    /// True if any pattern is found anywhere in the text.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Compiled rule set for one schema.
#[derive(Debug, Clone, Default)]
pub struct HeuristicRules {
    rules: Vec<HeuristicRule>,
}

impl HeuristicRules {
    /// Compile the built-in rules for ids present in the schema.
    pub fn for_schema(schema: &FeatureSchema) -> Result<Self, regex::Error> {
        let mut rules = Self::default();
        for (symptom, patterns) in RULES {
            if schema.contains(symptom) {
                rules.add_rule(symptom, patterns)?;
            }
        }
        Ok(rules)
    }

    /// Append patterns for a symptom, creating its rule if needed.
    pub fn add_rule(&mut self, symptom: &str, patterns: &[&str]) -> Result<(), regex::Error> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")))
            .collect::<Result<Vec<_>, _>>()?;

        match self.rules.iter_mut().find(|r| r.symptom == symptom) {
            Some(rule) => rule.patterns.extend(compiled),
            None => self.rules.push(HeuristicRule {
                symptom: symptom.to_string(),
                patterns: compiled,
            }),
        }
        Ok(())
    }

    /// Symptom ids whose rules fire on the text.
    pub fn detect<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.rules
            .iter()
            .filter(move |r| r.matches(text))
            .map(|r| r.symptom.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
