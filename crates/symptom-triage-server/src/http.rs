//! HTTP server setup with Axum

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{diagnose_from_text, extract, health_check};
use crate::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: AppState) -> Router {
    // The web front end is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/diagnose-from-text", post(diagnose_from_text))
        .route("/api/extract", post(extract))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
