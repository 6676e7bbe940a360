//! Symptom Triage Core Library
//!
//! Turns free-text symptom descriptions into a predicted condition, a
//! confidence with alternates, and the department to route the patient to.
//!
//! # Architecture
//!
//! ```text
//! Symptom text → Normalize → Extraction passes → Schema-aligned vector
//!                                  │
//!                ┌─────────────────┼──────────────────┐
//!                │ heuristics      │ synonym phrases  │ fuzzy windows
//!                │ direct tokens   │ negation removal │
//!                └─────────────────┼──────────────────┘
//!                                  ▼
//!                          Classifier (trait)
//!                                  │
//!                     confidence < 0.6 → alternates
//!                                  │
//!                                  ▼
//!             Department: map → symptom category → General Physician
//! ```
//!
//! # Core Principle
//!
//! **The context is immutable.** Everything is loaded once at startup and
//! shared read-only between requests.
//!
//! # Modules
//!
//! - [`config`]: Config directory layout and JSON loaders
//! - [`context`]: The startup-built [`TriageContext`]
//! - [`extractor`]: Normalizer, synonym expander, heuristics and feature extractor
//! - [`classifier`]: Classifier trait and the linear model artifact
//! - [`predictor`]: Prediction orchestrator and department routing
//! - [`models`]: Domain types (FeatureSchema, ExtractionResult, PredictionResult)

pub mod classifier;
pub mod config;
pub mod context;
pub mod extractor;
pub mod models;
pub mod predictor;

// Re-export commonly used types
pub use classifier::{Classifier, LinearClassifier};
pub use config::{ConfigError, ConfigPaths};
pub use context::{ClassifierSlot, TriageContext};
pub use extractor::{normalize, FeatureExtractor};
pub use models::{DiagnoseRequest, ExtractionResult, FeatureSchema, FeatureVector, PredictionResult};
pub use predictor::{DepartmentMap, DepartmentResolver, PredictError, Predictor};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Prediction error: {0}")]
    PredictionError(String),
}

impl From<config::ConfigError> for TriageError {
    fn from(e: config::ConfigError) -> Self {
        TriageError::ConfigError(e.to_string())
    }
}

impl From<extractor::ExtractorError> for TriageError {
    fn from(e: extractor::ExtractorError) -> Self {
        TriageError::ExtractionError(e.to_string())
    }
}

impl From<PredictError> for TriageError {
    fn from(e: PredictError) -> Self {
        match e {
            PredictError::InvalidRequest(msg) => TriageError::InvalidInput(msg),
            PredictError::FeatureExtractionFailed(e) => e.into(),
            PredictError::ClassifierUnavailable(msg) => TriageError::ClassifierUnavailable(msg),
            PredictError::PredictionFailed(e) => TriageError::PredictionError(e.to_string()),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load a triage engine from a config directory.
#[uniffi::export]
pub fn open_engine(config_dir: String) -> Result<Arc<TriageCore>, TriageError> {
    let ctx = TriageContext::load(&config_dir)?;
    Ok(Arc::new(TriageCore { ctx: Arc::new(ctx) }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe triage engine for FFI.
#[derive(uniffi::Object)]
pub struct TriageCore {
    ctx: Arc<TriageContext>,
}

impl TriageCore {
    /// Wrap an already-built context.
    pub fn from_context(ctx: Arc<TriageContext>) -> Arc<Self> {
        Arc::new(Self { ctx })
    }
}

#[uniffi::export]
impl TriageCore {
    /// Diagnose free symptom text.
    pub fn diagnose_text(&self, text: String) -> Result<FfiPrediction, TriageError> {
        let request = DiagnoseRequest::new(text);
        let result = self.ctx.diagnose(request.text()?)?;
        Ok(result.into())
    }

    /// Extract symptoms without classifying.
    pub fn extract_symptoms(&self, text: String) -> Result<FfiExtraction, TriageError> {
        let extraction = self.ctx.extractor().extract(&text)?;
        Ok(extraction.into())
    }

    /// Ordered symptom ids of the feature schema.
    pub fn schema(&self) -> Vec<String> {
        self.ctx.schema().symptoms().to_vec()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe prediction.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrediction {
    pub prediction: String,
    pub confidence: Option<f64>,
    pub probabilities: Option<Vec<f64>>,
    pub extracted: Vec<String>,
    pub department: String,
    pub alternates: Vec<String>,
}

impl From<PredictionResult> for FfiPrediction {
    fn from(result: PredictionResult) -> Self {
        Self {
            prediction: result.prediction,
            confidence: result.confidence,
            probabilities: result.probabilities,
            extracted: result.extracted,
            department: result.department,
            alternates: result.alternates,
        }
    }
}

/// FFI-safe extraction result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExtraction {
    pub extracted: Vec<String>,
    pub vector: Vec<u32>,
}

impl From<ExtractionResult> for FfiExtraction {
    fn from(extraction: ExtractionResult) -> Self {
        Self {
            vector: extraction.vector.as_slice().iter().map(|&v| u32::from(v)).collect(),
            extracted: extraction.keys,
        }
    }
}
