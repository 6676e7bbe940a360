//! Prediction request and result models.

use serde::{Deserialize, Serialize};

use crate::predictor::{PredictError, PredictResult};

/// Inbound diagnose request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl DiagnoseRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// The symptom text, rejecting a missing or blank field.
    pub fn text(&self) -> PredictResult<&str> {
        match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(PredictError::InvalidRequest(
                "Please enter some symptoms".into(),
            )),
        }
    }
}

/// Final diagnosis for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    /// Predicted condition, capitalized
    pub prediction: String,
    /// Highest class probability rounded to 3 places
    pub confidence: Option<f64>,
    /// Full distribution in classifier label order
    pub probabilities: Option<Vec<f64>>,
    /// Symptom ids found in the text
    pub extracted: Vec<String>,
    /// Department the patient should be routed to
    pub department: String,
    /// Next most likely conditions, only under low confidence
    pub alternates: Vec<String>,
}

impl PredictionResult {
    /// Whether the classifier was unsure enough to surface alternates.
    pub fn is_low_confidence(&self) -> bool {
        !self.alternates.is_empty()
    }
}
