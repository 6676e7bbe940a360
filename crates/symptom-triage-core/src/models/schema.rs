//! Feature schema and the feature vector aligned to it.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extractor::normalize;

/// Schema validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Feature schema is empty")]
    Empty,

    #[error("Duplicate symptom id in schema: {0}")]
    Duplicate(String),

    #[error("Symptom id at position {0} has no usable text")]
    Blank(usize),
}

/// Ordered, de-duplicated list of symptom identifiers.
///
/// Position in the schema is the index in every [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    symptoms: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from an ordered id list.
    pub fn new(symptoms: Vec<String>) -> Result<Self, SchemaError> {
        if symptoms.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(symptoms.len());
        for (i, id) in symptoms.iter().enumerate() {
            if normalize(id).is_empty() {
                return Err(SchemaError::Blank(i));
            }
            if positions.insert(id.clone(), i).is_some() {
                return Err(SchemaError::Duplicate(id.clone()));
            }
        }

        Ok(Self {
            symptoms,
            positions,
        })
    }

    /// Number of features (vector length).
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Vector position of a symptom id.
    pub fn index_of(&self, symptom: &str) -> Option<usize> {
        self.positions.get(symptom).copied()
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.positions.contains_key(symptom)
    }

    /// Symptom ids in vector order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// Build the vector for a set of found ids. Ids outside the schema are ignored.
    pub fn vectorize(&self, found: &BTreeSet<String>) -> FeatureVector {
        let mut vector = FeatureVector::zeros(self.len());
        for id in found {
            if let Some(i) = self.index_of(id) {
                vector.set(i);
            }
        }
        vector
    }
}

/// Boolean feature vector, one slot per schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<u8>);

impl FeatureVector {
    /// All-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at a position, `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Numeric form handed to the classifier.
    pub fn to_f64(&self) -> Vec<f64> {
        self.0.iter().map(|&v| f64::from(v)).collect()
    }

    /// Number of active (1) features.
    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|&&v| v == 1).count()
    }

    fn set(&mut self, index: usize) {
        self.0[index] = 1;
    }
}
