//! Softmax linear classifier loaded from a JSON artifact.
//!
//! `model.json` holds coefficients and intercepts, `labels.json` the label
//! encoder classes. Class `i` in the model is `classes[i]` in the encoder.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Classifier, ClassifierError, ClassifierResult, RawPrediction};

/// Serialized model weights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearModelArtifact {
    /// One row of coefficients per class
    pub coeffs: Vec<Vec<f64>>,
    /// One intercept per class
    pub intercept: Vec<f64>,
}

/// Serialized label encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

/// Multinomial logistic regression over the feature vector.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    model: LinearModelArtifact,
    encoder: LabelEncoder,
    n_features: usize,
}

impl LinearClassifier {
    /// Validate shapes and build the classifier.
    pub fn new(model: LinearModelArtifact, encoder: LabelEncoder) -> ClassifierResult<Self> {
        let n_classes = model.coeffs.len();
        if n_classes == 0 {
            return Err(ClassifierError::InvalidArtifact("model has no classes".into()));
        }
        if model.intercept.len() != n_classes {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} coefficient rows but {} intercepts",
                n_classes,
                model.intercept.len()
            )));
        }
        if encoder.classes.len() != n_classes {
            return Err(ClassifierError::InvalidArtifact(format!(
                "model has {} classes, label encoder has {}",
                n_classes,
                encoder.classes.len()
            )));
        }

        let n_features = model.coeffs[0].len();
        if let Some(row) = model.coeffs.iter().position(|r| r.len() != n_features) {
            return Err(ClassifierError::InvalidArtifact(format!(
                "coefficient row {} has {} features, expected {}",
                row,
                model.coeffs[row].len(),
                n_features
            )));
        }

        Ok(Self {
            model,
            encoder,
            n_features,
        })
    }

    /// Load model and label encoder artifacts.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, labels_path: Q) -> ClassifierResult<Self> {
        let model = read_artifact(model_path.as_ref())?;
        let encoder = read_artifact(labels_path.as_ref())?;
        Self::new(model, encoder)
    }

    /// Number of input features the model expects.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[String] {
        &self.encoder.classes
    }

    /// Class probabilities for one vector.
    pub fn predict_proba(&self, features: &[f64]) -> ClassifierResult<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let scores: Vec<f64> = self
            .model
            .coeffs
            .iter()
            .zip(&self.model.intercept)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();

        softmax(&scores)
    }
}

impl Classifier for LinearClassifier {
    fn predict_top(&self, features: &[f64]) -> ClassifierResult<RawPrediction> {
        let distribution = self.predict_proba(features)?;
        let label_index = argmax(&distribution)
            .ok_or_else(|| ClassifierError::Inference("empty distribution".into()))?;

        Ok(RawPrediction {
            label_index,
            distribution: Some(distribution),
        })
    }

    fn decode_label(&self, index: usize) -> Option<String> {
        self.encoder.inverse_transform(index).map(String::from)
    }
}

/// Numerically stable softmax.
fn softmax(scores: &[f64]) -> ClassifierResult<Vec<f64>> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(ClassifierError::Inference("non-finite class score".into()));
    }

    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    Ok(exps.into_iter().map(|e| e / total).collect())
}

/// Index of the first maximum.
fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> ClassifierResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| ClassifierError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ClassifierError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LinearClassifier {
        LinearClassifier::new(
            LinearModelArtifact {
                coeffs: vec![vec![2.0, 0.0], vec![0.0, 2.0], vec![0.0, 0.0]],
                intercept: vec![0.0, 0.0, 0.5],
            },
            LabelEncoder {
                classes: vec!["Malaria".into(), "Migraine".into(), "Common Cold".into()],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_predict_top() {
        let clf = classifier();
        let raw = clf.predict_top(&[1.0, 0.0]).unwrap();

        assert_eq!(raw.label_index, 0);
        let dist = raw.distribution.unwrap();
        assert_eq!(dist.len(), 3);
        assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(clf.decode_label(raw.label_index).as_deref(), Some("Malaria"));
    }

    #[test]
    fn test_zero_vector_uses_intercepts() {
        let raw = classifier().predict_top(&[0.0, 0.0]).unwrap();
        assert_eq!(raw.label_index, 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = classifier().predict_top(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::DimensionMismatch { expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_decode_out_of_range() {
        assert_eq!(classifier().decode_label(7), None);
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let encoder = LabelEncoder {
            classes: vec!["A".into(), "B".into()],
        };

        let ragged = LinearModelArtifact {
            coeffs: vec![vec![1.0, 0.0], vec![1.0]],
            intercept: vec![0.0, 0.0],
        };
        assert!(LinearClassifier::new(ragged, encoder.clone()).is_err());

        let short_encoder = LinearModelArtifact {
            coeffs: vec![vec![1.0], vec![1.0], vec![1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        };
        assert!(LinearClassifier::new(short_encoder, encoder).is_err());
    }

    #[test]
    fn test_argmax_prefers_first() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearClassifier::load("/nonexistent/model.json", "/nonexistent/labels.json")
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Io { .. }));
    }
}
