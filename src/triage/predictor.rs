use crate::models::PatientProfile;

use super::classifier::clinical_features;
use super::scoring::{FeatureVector, ScoringError, ScoringModel};
use super::types::{PredictionStage, TriageError};

/// The full profile as growth-model input: the clinical subset plus
/// location and insurance. Models ignore features they do not reference.
pub fn growth_features(profile: &PatientProfile) -> FeatureVector {
    clinical_features(profile)
        .with_category("region", &profile.region)
        .with_category("facility", &profile.facility)
        .with_number("has_insurance", if profile.has_insurance { 1.0 } else { 0.0 })
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Wraps the regression model that estimates cyst growth.
pub struct GrowthPredictor {
    model: Box<dyn ScoringModel>,
}

impl GrowthPredictor {
    pub fn new(model: Box<dyn ScoringModel>) -> Self {
        Self { model }
    }

    pub fn predict_growth(&self, profile: &PatientProfile) -> Result<f64, TriageError> {
        let growth = self
            .model
            .score(&growth_features(profile))
            .map(round2)
            .and_then(|v| if v.is_finite() { Ok(v) } else { Err(ScoringError::NonFinite) })
            .map_err(|e| TriageError::prediction(PredictionStage::Growth, e))?;
        Ok(growth)
    }
}
