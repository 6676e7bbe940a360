//! Condition classifier seam.
//!
//! The pipeline only needs two operations from a trained model: score a
//! feature vector, and turn a class index back into a condition label.

#[cfg(any(test, feature = "test-util"))]
mod fixed;
mod linear;

#[cfg(any(test, feature = "test-util"))]
pub use fixed::*;
pub use linear::*;

use std::path::PathBuf;

use thiserror::Error;

/// Classifier errors.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Inference error: {0}")]
    Inference(String),
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Raw classifier output before label decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    /// Encoded index of the predicted class
    pub label_index: usize,
    /// Probability per class, in encoder order, if the model supports it
    pub distribution: Option<Vec<f64>>,
}

/// A trained condition classifier.
pub trait Classifier: Send + Sync {
    /// Predict the top class for a schema-aligned feature vector.
    fn predict_top(&self, features: &[f64]) -> ClassifierResult<RawPrediction>;

    /// Decode a class index into its condition label.
    fn decode_label(&self, index: usize) -> Option<String>;
}
