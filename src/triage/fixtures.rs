//! Test doubles shared by the triage and api test modules.

use std::sync::{Arc, Mutex};

use crate::models::PatientProfile;

use super::engine::DefaultTriageEngine;
use super::reference::ReferenceTables;
use super::scoring::{FeatureVector, ScoringError, ScoringModel};

/// Always returns the same score.
pub struct FixedModel(pub f64);

impl ScoringModel for FixedModel {
    fn score(&self, _features: &FeatureVector) -> Result<f64, ScoringError> {
        Ok(self.0)
    }
}

/// Always fails, as a model fed an incompatible feature shape would.
pub struct FailingModel;

impl ScoringModel for FailingModel {
    fn score(&self, _features: &FeatureVector) -> Result<f64, ScoringError> {
        Err(ScoringError::Internal("feature shape mismatch".into()))
    }
}

/// Returns a fixed score and keeps the last feature vector it was given.
pub struct RecordingModel {
    score: f64,
    pub seen: Arc<Mutex<Option<FeatureVector>>>,
}

impl RecordingModel {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            seen: Arc::new(Mutex::new(None)),
        }
    }
}

impl ScoringModel for RecordingModel {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        if let Ok(mut seen) = self.seen.lock() {
            *seen = Some(features.clone());
        }
        Ok(self.score)
    }
}

/// The worked example patient: 45, post-menopausal, 6.2 mm simple cyst, insured.
pub fn sample_profile() -> PatientProfile {
    PatientProfile {
        age: 45,
        menopause_status: "post".into(),
        cyst_size: 6.2,
        cyst_growth_rate: 0.3,
        ca_125_level: 40.0,
        ultrasound_features: "simple".into(),
        reported_symptoms: "none".into(),
        region: "Nairobi".into(),
        facility: "ClinicA".into(),
        has_insurance: true,
    }
}

/// Engine over the fixture tables with fixed model outputs.
pub fn engine_with(growth: f64, treatment_code: f64) -> DefaultTriageEngine {
    DefaultTriageEngine::new(
        Box::new(FixedModel(growth)),
        Box::new(FixedModel(treatment_code)),
        ReferenceTables::load_test(),
    )
}
