use std::time::Instant;

use crate::config::TriageConfig;
use crate::models::PatientProfile;

use super::availability::check_availability;
use super::classifier::TreatmentClassifier;
use super::cost::resolve_cost;
use super::predictor::GrowthPredictor;
use super::reference::ReferenceTables;
use super::scoring::{ModelArtifact, ScoringModel};
use super::types::{DecisionResult, EngineSummary, GrowthPrediction, TriageEngine, TriageError};

/// Default decision orchestrator: two models plus the reference tables.
///
/// Immutable once built; share it behind an `Arc` across requests.
pub struct DefaultTriageEngine {
    growth: GrowthPredictor,
    classifier: TreatmentClassifier,
    tables: ReferenceTables,
}

impl DefaultTriageEngine {
    pub fn new(
        growth_model: Box<dyn ScoringModel>,
        treatment_model: Box<dyn ScoringModel>,
        tables: ReferenceTables,
    ) -> Self {
        Self {
            growth: GrowthPredictor::new(growth_model),
            classifier: TreatmentClassifier::new(treatment_model),
            tables,
        }
    }

    /// Load both model artifacts and both tables named by `config`.
    pub fn initialize(config: &TriageConfig) -> Result<Self, TriageError> {
        let start = Instant::now();

        let growth = ModelArtifact::load(&config.growth_model_path)?;
        let treatment = ModelArtifact::load(&config.treatment_model_path)?;
        let tables = ReferenceTables::load(&config.resources_path, &config.costs_path)?;

        tracing::info!(
            growth_kind = growth.kind(),
            treatment_kind = treatment.kind(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Triage engine initialized"
        );

        Ok(Self::new(Box::new(growth), Box::new(treatment), tables))
    }
}

impl TriageEngine for DefaultTriageEngine {
    fn recommend(&self, profile: &PatientProfile) -> Result<DecisionResult, TriageError> {
        let category = self.classifier.classify_treatment(profile).inspect_err(|e| {
            tracing::warn!(error = %e, "Treatment classification failed");
        })?;

        let available = check_availability(
            &profile.region,
            &profile.facility,
            category,
            &self.tables.resources,
        );
        let cost_breakdown = resolve_cost(
            &profile.region,
            &profile.facility,
            category,
            profile.has_insurance,
            &self.tables.costs,
        );

        tracing::info!(
            region = %profile.region,
            facility = %profile.facility,
            category = %category,
            available,
            cost_found = cost_breakdown.is_found(),
            "Treatment recommendation resolved"
        );

        Ok(DecisionResult {
            recommended_treatment: category,
            available,
            cost_breakdown,
        })
    }

    fn predict(&self, profile: &PatientProfile) -> Result<GrowthPrediction, TriageError> {
        let predicted_growth = self.growth.predict_growth(profile).inspect_err(|e| {
            tracing::warn!(error = %e, "Growth prediction failed");
        })?;
        tracing::debug!(predicted_growth, "Growth predicted");
        Ok(GrowthPrediction { predicted_growth })
    }

    fn summary(&self) -> EngineSummary {
        EngineSummary {
            resource_records: self.tables.resources.len(),
            cost_records: self.tables.costs.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::TreatmentCategory;
    use crate::triage::cost::{CostBreakdown, CostOutcome};
    use crate::triage::fixtures::{engine_with, sample_profile, FailingModel, FixedModel};
    use crate::triage::types::PredictionStage;

    #[test]
    fn worked_example_insured_observation() {
        let engine = engine_with(0.0, 0.0);
        let result = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(
            result,
            DecisionResult {
                recommended_treatment: TreatmentCategory::Observation,
                available: true,
                cost_breakdown: CostOutcome::Found(CostBreakdown {
                    base_cost: 1000.0,
                    nhif: true,
                    co_pay: 200.0,
                    out_of_pocket: 0.0,
                }),
            }
        );
    }

    #[test]
    fn worked_example_serializes_to_wire_schema() {
        let engine = engine_with(0.0, 0.0);
        let json = serde_json::to_value(engine.recommend(&sample_profile()).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "recommended_treatment": "Observation",
                "available": true,
                "cost_breakdown": {"base_cost": 1000.0, "nhif": true, "co_pay": 200.0, "out_of_pocket": 0.0}
            })
        );
    }

    #[test]
    fn missing_cost_row_is_marker_not_error() {
        let mut tables = ReferenceTables::load_test();
        tables.costs.clear();
        let engine =
            DefaultTriageEngine::new(Box::new(FixedModel(0.0)), Box::new(FixedModel(0.0)), tables);

        let result = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(result.recommended_treatment, TreatmentCategory::Observation);
        assert!(result.available);
        assert_eq!(result.cost_breakdown, CostOutcome::NotAvailable);
    }

    #[test]
    fn unmapped_code_yields_unknown_unavailable_uncosted() {
        let engine = engine_with(0.0, 99.0);
        let result = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(result.recommended_treatment, TreatmentCategory::Unknown);
        assert!(!result.available);
        assert_eq!(result.cost_breakdown, CostOutcome::NotAvailable);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recommended_treatment"], "Unknown");
    }

    #[test]
    fn known_treatment_without_stock_is_still_costed() {
        // Nairobi/ClinicA has Surgery priced but zero stock.
        let engine = engine_with(0.0, 3.0);
        let result = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(result.recommended_treatment, TreatmentCategory::Surgery);
        assert!(!result.available);
        assert_eq!(result.cost_breakdown.breakdown().unwrap().co_pay, 15000.0);
    }

    #[test]
    fn uninsured_patient_sees_out_of_pocket() {
        let engine = engine_with(0.0, 0.0);
        let mut profile = sample_profile();
        profile.has_insurance = false;
        let result = engine.recommend(&profile).unwrap();
        let breakdown = result.cost_breakdown.breakdown().unwrap();
        assert_eq!(breakdown.co_pay, 0.0);
        assert_eq!(breakdown.out_of_pocket, 800.0);
    }

    #[test]
    fn case_variants_of_location_resolve_identically() {
        let engine = engine_with(0.0, 0.0);
        let mut shouted = sample_profile();
        shouted.region = "NAIROBI".into();
        shouted.facility = "clinica".into();
        assert_eq!(
            engine.recommend(&sample_profile()).unwrap(),
            engine.recommend(&shouted).unwrap()
        );
    }

    #[test]
    fn recommend_is_idempotent() {
        let engine = engine_with(0.0, 2.0);
        let first = engine.recommend(&sample_profile()).unwrap();
        let second = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn classification_failure_aborts_pipeline() {
        let engine = DefaultTriageEngine::new(
            Box::new(FixedModel(1.0)),
            Box::new(FailingModel),
            ReferenceTables::load_test(),
        );
        let err = engine.recommend(&sample_profile()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Prediction {
                stage: PredictionStage::Classification,
                ..
            }
        ));
    }

    #[test]
    fn predict_is_independent_of_classifier() {
        let engine = DefaultTriageEngine::new(
            Box::new(FixedModel(2.346)),
            Box::new(FailingModel),
            ReferenceTables::load_test(),
        );
        let prediction = engine.predict(&sample_profile()).unwrap();
        assert_eq!(prediction.predicted_growth, 2.35);
    }

    #[test]
    fn predict_failure_is_growth_stage() {
        let engine = DefaultTriageEngine::new(
            Box::new(FailingModel),
            Box::new(FixedModel(0.0)),
            ReferenceTables::load_test(),
        );
        let err = engine.predict(&sample_profile()).unwrap_err();
        assert!(matches!(
            err,
            TriageError::Prediction {
                stage: PredictionStage::Growth,
                ..
            }
        ));
        // The recommendation side still works.
        assert!(engine.recommend(&sample_profile()).is_ok());
    }

    #[test]
    fn summary_counts_tables() {
        let summary = engine_with(0.0, 0.0).summary();
        assert_eq!(summary.resource_records, 5);
        assert_eq!(summary.cost_records, 4);
    }

    #[test]
    fn concurrent_requests_share_engine() {
        let engine: Arc<dyn TriageEngine> = Arc::new(engine_with(1.0, 1.0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.recommend(&sample_profile()).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0].recommended_treatment, TreatmentCategory::Medication);
    }

    #[test]
    fn initialize_loads_artifacts_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        let data = dir.path().join("data");
        std::fs::create_dir_all(&models).unwrap();
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(
            models.join("growth_model.json"),
            r#"{"kind":"regression","intercept":0.1,"numeric":{"cyst_size":{"weight":0.5}}}"#,
        )
        .unwrap();
        std::fs::write(
            models.join("treatment_model.json"),
            r#"{"kind":"classification","classes":[{"code":0,"intercept":1.0},{"code":3}]}"#,
        )
        .unwrap();
        std::fs::write(
            data.join("resources_inventory.json"),
            r#"[{"region":"Nairobi","facility":"ClinicA","category":"Observation","available_stock":5}]"#,
        )
        .unwrap();
        std::fs::write(data.join("treatment_costs.json"), "[]").unwrap();

        let config = TriageConfig::with_data_dir(dir.path());
        let engine = DefaultTriageEngine::initialize(&config).unwrap();

        // 0.1 + 0.5 * 6.2
        assert_eq!(engine.predict(&sample_profile()).unwrap().predicted_growth, 3.2);
        let result = engine.recommend(&sample_profile()).unwrap();
        assert_eq!(result.recommended_treatment, TreatmentCategory::Observation);
        assert!(result.available);
        assert_eq!(result.cost_breakdown, CostOutcome::NotAvailable);
    }

    #[test]
    fn shipped_demo_data_loads() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demo_data");
        let config = TriageConfig::with_data_dir(&dir);
        let engine = DefaultTriageEngine::initialize(&config).unwrap();

        let summary = engine.summary();
        assert!(summary.resource_records > 0);
        assert!(summary.cost_records > 0);
        assert_eq!(engine.tables.unrecognized_category_rows(), 0);

        let result = engine.recommend(&sample_profile()).unwrap();
        assert!(result.recommended_treatment.is_known());
        assert!(engine.predict(&sample_profile()).is_ok());
    }

    #[test]
    fn initialize_fails_on_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = TriageConfig::with_data_dir(dir.path());
        let err = DefaultTriageEngine::initialize(&config).err().unwrap();
        assert!(matches!(err, TriageError::ModelLoad(..)));
    }
}
