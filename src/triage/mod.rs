//! Triage decision core.
//!
//! ```text
//! profile ─┬─► GrowthPredictor ───────────────────────────► predicted_growth
//!          └─► TreatmentClassifier ─► category ─┬─► check_availability ─┐
//!                                               └─► resolve_cost ───────┴─► DecisionResult
//! ```
//!
//! Models and reference tables are loaded once by `DefaultTriageEngine::initialize`
//! and only read afterwards, so requests run concurrently without locking.

pub mod availability;
pub mod classifier;
pub mod cost;
pub mod engine;
pub mod predictor;
pub mod reference;
pub mod scoring;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use availability::check_availability;
pub use classifier::TreatmentClassifier;
pub use cost::{resolve_cost, CostBreakdown, CostOutcome};
pub use engine::DefaultTriageEngine;
pub use predictor::GrowthPredictor;
pub use reference::ReferenceTables;
pub use scoring::{FeatureValue, FeatureVector, ModelArtifact, ScoringError, ScoringModel};
pub use types::{
    DecisionResult, EngineSummary, GrowthPrediction, PredictionStage, TriageEngine, TriageError,
};
