//! Department routing for a predicted condition.
//!
//! Precedence:
//! 1. Department map entry for the label (case-insensitive, trimmed)
//! 2. First symptom category with a found member
//! 3. General Physician

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// Used when neither the map nor any category applies.
pub const DEFAULT_DEPARTMENT: &str = "General Physician";

/// Symptom categories in evaluation order. First match wins.
pub const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "Cardiology",
        &["chest_pain", "breathlessness", "fast_heart_rate", "sweating"],
    ),
    (
        "Gastroenterology",
        &["abdominal_pain", "vomiting", "nausea", "diarrhoea", "indigestion"],
    ),
    (
        "Dermatology",
        &["itching", "skin_rash", "blister", "red_spots_over_body"],
    ),
    (
        "Urology",
        &[
            "burning_micturition",
            "dark_urine",
            "yellow_urine",
            "pain_during_bowel_movements",
        ],
    ),
    (
        "Neurology",
        &[
            "dizziness",
            "headache",
            "loss_of_balance",
            "weakness_in_limbs",
            "blurred_and_distorted_vision",
        ],
    ),
    (
        "Orthopedics",
        &["joint_pain", "knee_pain", "swelling_joints", "movement_stiffness"],
    ),
    (
        "General Medicine",
        &["high_fever", "chills", "fatigue", "malaise", "sweating"],
    ),
    (
        "Psychiatry",
        &["anxiety", "depression", "irritability", "restlessness"],
    ),
];

/// Condition label → department, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentMap {
    entries: HashMap<String, String>,
}

impl DepartmentMap {
    /// Build from raw label → department pairs.
    ///
    /// Labels that collide after trimming and lowercasing keep the first
    /// department seen.
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        for (label, department) in entries {
            map.entries.entry(map_key(&label)).or_insert(department);
        }
        map
    }

    /// Department for a label, if mapped.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(&map_key(label)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn map_key(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Which rule produced a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepartmentSource {
    Map,
    Category,
    Default,
}

/// Resolved department with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentMatch {
    pub department: String,
    pub source: DepartmentSource,
}

/// Resolves departments from the map, then symptom categories.
#[derive(Debug, Clone, Default)]
pub struct DepartmentResolver {
    map: DepartmentMap,
}

impl DepartmentResolver {
    pub fn new(map: DepartmentMap) -> Self {
        Self { map }
    }

    /// Resolve the department for a predicted label and the found symptoms.
    pub fn resolve(&self, label: &str, found: &[String]) -> DepartmentMatch {
        if let Some(department) = self.map.lookup(label) {
            return DepartmentMatch {
                department: department.to_string(),
                source: DepartmentSource::Map,
            };
        }

        if let Some(category) = category_for(found) {
            return DepartmentMatch {
                department: category.to_string(),
                source: DepartmentSource::Category,
            };
        }

        DepartmentMatch {
            department: DEFAULT_DEPARTMENT.to_string(),
            source: DepartmentSource::Default,
        }
    }

    pub fn map(&self) -> &DepartmentMap {
        &self.map
    }
}

/// First category with any member in the found set.
pub fn category_for(found: &[String]) -> Option<&'static str> {
    CATEGORY_RULES
        .iter()
        .find(|(_, members)| members.iter().any(|m| found.iter().any(|f| f == m)))
        .map(|(category, _)| *category)
}
