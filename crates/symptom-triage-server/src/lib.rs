//! HTTP front for the symptom triage pipeline.
//!
//! Serves the diagnose and extract endpoints over a [`TriageContext`] loaded
//! once at startup and shared read-only between requests.

pub mod handlers;
pub mod http;

pub use handlers::*;
pub use http::create_router;

use std::sync::Arc;

use symptom_triage_core::TriageContext;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub ctx: Arc<TriageContext>,
}

impl AppState {
    pub fn new(ctx: TriageContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }
}
