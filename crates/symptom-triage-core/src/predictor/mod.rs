//! Prediction orchestrator.
//!
//! Pipeline: Feature Extraction → Classifier → Confidence / Alternates →
//! Department Resolution

mod department;

pub use department::*;

use std::cmp::Ordering;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, ClassifierError};
use crate::context::TriageContext;
use crate::extractor::ExtractorError;
use crate::models::PredictionResult;

/// Below this confidence the next best conditions are surfaced.
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Alternates surfaced under low confidence.
pub const ALTERNATE_COUNT: usize = 2;

/// Per-request prediction errors.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Feature extraction failed: {0}")]
    FeatureExtractionFailed(#[from] ExtractorError),

    #[error("Model or encoder not loaded: {0}")]
    ClassifierUnavailable(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(#[from] ClassifierError),
}

pub type PredictResult<T> = Result<T, PredictError>;

/// Runs the full text → diagnosis pipeline against a shared context.
pub struct Predictor<'a> {
    ctx: &'a TriageContext,
}

impl<'a> Predictor<'a> {
    pub fn new(ctx: &'a TriageContext) -> Self {
        Self { ctx }
    }

    /// Diagnose free symptom text.
    pub fn diagnose(&self, text: &str) -> PredictResult<PredictionResult> {
        // Step 1: Extract features
        let extraction = self.ctx.extractor().extract(text)?;
        debug!(
            extracted = ?extraction.keys,
            active = extraction.active_count(),
            "features extracted"
        );

        // Step 2: Classify the aligned vector
        let classifier = self
            .ctx
            .classifier()
            .map_err(|reason| PredictError::ClassifierUnavailable(reason.to_string()))?;
        let raw = classifier.predict_top(&extraction.vector.to_f64())?;
        let label = decode_or_index(classifier, raw.label_index);

        // Step 3: Confidence and alternates
        let distribution = raw.distribution;
        let confidence = distribution.as_deref().and_then(max_probability);
        let alternates = match (confidence, distribution.as_deref()) {
            (Some(c), Some(dist)) if c < LOW_CONFIDENCE_THRESHOLD => {
                let alternates = top_alternates(classifier, dist, raw.label_index, &label);
                warn!(confidence = c, ?alternates, "low confidence prediction");
                alternates
            }
            _ => Vec::new(),
        };

        // Step 4: Department
        let department = self.ctx.departments().resolve(&label, &extraction.keys);
        info!(
            prediction = %label,
            department = %department.department,
            source = ?department.source,
            "diagnosis complete"
        );

        Ok(PredictionResult {
            prediction: capitalize(&label),
            confidence: confidence.map(round3),
            probabilities: distribution,
            extracted: extraction.keys,
            department: department.department,
            alternates,
        })
    }
}

/// Decode a label, falling back to the numeric index.
fn decode_or_index(classifier: &dyn Classifier, index: usize) -> String {
    classifier.decode_label(index).unwrap_or_else(|| {
        warn!(index, "label encoder could not decode class, using index");
        index.to_string()
    })
}

fn max_probability(distribution: &[f64]) -> Option<f64> {
    distribution
        .iter()
        .copied()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Highest-probability labels other than the top prediction.
///
/// Ties keep distribution order.
fn top_alternates(
    classifier: &dyn Classifier,
    distribution: &[f64],
    top_index: usize,
    top_label: &str,
) -> Vec<String> {
    let mut ranked: Vec<usize> = (0..distribution.len()).filter(|&i| i != top_index).collect();
    ranked.sort_by(|&a, &b| {
        distribution[b]
            .partial_cmp(&distribution[a])
            .unwrap_or(Ordering::Equal)
    });

    ranked
        .into_iter()
        .map(|i| decode_or_index(classifier, i))
        .filter(|label| label != top_label)
        .take(ALTERNATE_COUNT)
        .collect()
}

/// First character uppercase, the rest lowercase.
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
