use crate::models::{PatientProfile, TreatmentCategory};

use super::scoring::{FeatureVector, ScoringError, ScoringModel};
use super::types::{PredictionStage, TriageError};

/// The clinical subset of a profile: the only inputs the treatment model sees.
pub fn clinical_features(profile: &PatientProfile) -> FeatureVector {
    FeatureVector::new()
        .with_number("age", f64::from(profile.age))
        .with_category("menopause_status", &profile.menopause_status)
        .with_number("cyst_size", profile.cyst_size)
        .with_number("cyst_growth_rate", profile.cyst_growth_rate)
        .with_number("ca_125_level", profile.ca_125_level)
        .with_category("ultrasound_features", &profile.ultrasound_features)
        .with_category("reported_symptoms", &profile.reported_symptoms)
}

/// Maps a patient profile to a treatment category.
pub struct TreatmentClassifier {
    model: Box<dyn ScoringModel>,
}

impl TreatmentClassifier {
    pub fn new(model: Box<dyn ScoringModel>) -> Self {
        Self { model }
    }

    /// Score the clinical features and map the class code to a label.
    ///
    /// Codes outside the fixed map yield `Unknown`, which is not an error.
    /// A score that is not an integral code is a model fault.
    pub fn classify_treatment(
        &self,
        profile: &PatientProfile,
    ) -> Result<TreatmentCategory, TriageError> {
        let fail = |e| TriageError::prediction(PredictionStage::Classification, e);

        let raw = self.model.score(&clinical_features(profile)).map_err(fail)?;
        let code = class_code(raw).map_err(fail)?;

        let category = TreatmentCategory::from_code(code);
        if !category.is_known() {
            tracing::warn!(code, "Treatment model emitted an unmapped class code");
        }
        Ok(category)
    }
}

fn class_code(raw: f64) -> Result<i64, ScoringError> {
    if !raw.is_finite() {
        return Err(ScoringError::NonFinite);
    }
    if raw.fract() != 0.0 || raw < i64::MIN as f64 || raw > i64::MAX as f64 {
        return Err(ScoringError::Internal(format!(
            "class code {raw} is not an integer"
        )));
    }
    Ok(raw as i64)
}
