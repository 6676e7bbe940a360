//! Feature extraction output.

use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Symptoms found in one piece of text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    /// Found symptom ids, sorted
    #[serde(rename = "extracted")]
    pub keys: Vec<String>,
    /// Vector aligned to the feature schema
    pub vector: FeatureVector,
}

impl ExtractionResult {
    /// Whether a symptom id was found.
    pub fn contains(&self, symptom: &str) -> bool {
        self.keys.binary_search_by(|k| k.as_str().cmp(symptom)).is_ok()
    }

    /// Number of schema features switched on.
    pub fn active_count(&self) -> usize {
        self.vector.active_count()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
