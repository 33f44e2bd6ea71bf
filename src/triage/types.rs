use serde::Serialize;
use thiserror::Error;

use crate::models::{PatientProfile, TreatmentCategory};

use super::cost::CostOutcome;
use super::scoring::ScoringError;

// ---------------------------------------------------------------------------
// PredictionStage
// ---------------------------------------------------------------------------

/// Which model failed to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStage {
    Growth,
    Classification,
}

impl PredictionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growth => "growth",
            Self::Classification => "classification",
        }
    }
}

impl std::fmt::Display for PredictionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TriageError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum TriageError {
    /// Terminal for the request. Scoring is deterministic, so never retried.
    #[error("Prediction error at {stage} stage: {source}")]
    Prediction {
        stage: PredictionStage,
        #[source]
        source: ScoringError,
    },

    #[error("Model load failed ({0}): {1}")]
    ModelLoad(String, String),

    #[error("Model artifact invalid ({0}): {1}")]
    ModelInvalid(String, String),

    #[error("Reference data load failed ({0}): {1}")]
    ReferenceDataLoad(String, String),

    #[error("Reference data parse failed ({0}): {1}")]
    ReferenceDataParse(String, String),
}

impl TriageError {
    pub(crate) fn prediction(stage: PredictionStage, source: ScoringError) -> Self {
        Self::Prediction { stage, source }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Output of the growth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPrediction {
    /// Rounded to two decimal places.
    pub predicted_growth: f64,
}

/// Output of the recommendation pipeline.
///
/// A known treatment with no stock and no pricing is still a complete
/// decision; resolver misses live in `available` and `cost_breakdown`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub recommended_treatment: TreatmentCategory,
    pub available: bool,
    pub cost_breakdown: CostOutcome,
}

/// Sizes of the loaded reference tables, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineSummary {
    pub resource_records: usize,
    pub cost_records: usize,
}

// ---------------------------------------------------------------------------
// TriageEngine trait
// ---------------------------------------------------------------------------

/// The decision orchestrator as seen by transports.
pub trait TriageEngine: Send + Sync {
    /// Classify, then resolve availability and cost for the classified category.
    fn recommend(&self, profile: &PatientProfile) -> Result<DecisionResult, TriageError>;

    /// Growth prediction only. Shares nothing with `recommend`.
    fn predict(&self, profile: &PatientProfile) -> Result<GrowthPrediction, TriageError>;

    fn summary(&self) -> EngineSummary;
}
