//! Domain models for the symptom triage pipeline.

mod extraction;
mod prediction;
mod schema;

pub use extraction::*;
pub use prediction::*;
pub use schema::*;
