//! Deterministic classifier for testing without a trained model.

use super::{Classifier, ClassifierError, ClassifierResult, RawPrediction};

/// Returns the same distribution for every input.
///
/// The predicted index is the first maximum of the distribution.
#[derive(Debug, Clone)]
pub struct FixedClassifier {
    labels: Vec<String>,
    distribution: Option<Vec<f64>>,
    top: usize,
}

impl FixedClassifier {
    /// Classifier reporting a full distribution over `labels`.
    pub fn new(labels: &[&str], distribution: &[f64]) -> ClassifierResult<Self> {
        if labels.len() != distribution.len() {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} labels but {} probabilities",
                labels.len(),
                distribution.len()
            )));
        }
        let top = distribution
            .iter()
            .enumerate()
            .fold(0, |best, (i, &p)| if p > distribution[best] { i } else { best });

        Ok(Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            distribution: Some(distribution.to_vec()),
            top,
        })
    }

    /// Classifier that only reports a label, no probabilities.
    pub fn label_only(labels: &[&str], top: usize) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            distribution: None,
            top,
        }
    }
}

impl Classifier for FixedClassifier {
    fn predict_top(&self, _features: &[f64]) -> ClassifierResult<RawPrediction> {
        Ok(RawPrediction {
            label_index: self.top,
            distribution: self.distribution.clone(),
        })
    }

    fn decode_label(&self, index: usize) -> Option<String> {
        self.labels.get(index).cloned()
    }
}

/// Classifier whose inference always fails.
#[derive(Debug, Clone, Default)]
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict_top(&self, _features: &[f64]) -> ClassifierResult<RawPrediction> {
        Err(ClassifierError::Inference("model raised during inference".into()))
    }

    fn decode_label(&self, _index: usize) -> Option<String> {
        None
    }
}
