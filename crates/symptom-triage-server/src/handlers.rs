//! Request handlers.
//!
//! Every per-request failure answers 200 with `{"error": ...}`; the web
//! front end reads the error field rather than the status code.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use symptom_triage_core::extractor::ExtractorError;
use symptom_triage_core::models::{DiagnoseRequest, ExtractionResult, PredictionResult};
use symptom_triage_core::predictor::PredictError;

use crate::AppState;

/// Handler errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    Rejected(#[from] JsonRejection),

    #[error(transparent)]
    Predict(#[from] PredictError),

    #[error(transparent)]
    Extract(#[from] ExtractorError),
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Error payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "request failed");
        (
            StatusCode::OK,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /api/diagnose-from-text
pub async fn diagnose_from_text(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> ApiResult<PredictionResult> {
    let Json(request) = payload?;
    let result = state.ctx.diagnose(request.text()?)?;
    Ok(Json(result))
}

/// POST /api/extract
///
/// Extraction only. A missing text field extracts nothing.
pub async fn extract(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> ApiResult<ExtractionResult> {
    let Json(request) = payload?;
    let text = request.text.as_deref().unwrap_or_default();
    let result = state.ctx.extractor().extract(text)?;
    Ok(Json(result))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
