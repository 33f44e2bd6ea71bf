use std::path::Path;

use serde::de::DeserializeOwned;

use crate::models::{CostRecord, ResourceRecord, TreatmentCategory};

use super::types::TriageError;

/// Normalized lookup key shared by both resolvers.
///
/// Normalization is lowercasing only; no trimming, no fuzzy matching.
pub(crate) struct TableKey {
    region: String,
    facility: String,
    category: &'static str,
}

impl TableKey {
    /// `None` for `Unknown`: the sentinel has no rows to match.
    pub(crate) fn new(region: &str, facility: &str, category: TreatmentCategory) -> Option<Self> {
        category.is_known().then(|| Self {
            region: region.to_lowercase(),
            facility: facility.to_lowercase(),
            category: category.key(),
        })
    }

    pub(crate) fn matches(&self, region: &str, facility: &str, category: &str) -> bool {
        category.to_lowercase() == self.category
            && region.to_lowercase() == self.region
            && facility.to_lowercase() == self.facility
    }
}

/// Resource and cost tables, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub resources: Vec<ResourceRecord>,
    pub costs: Vec<CostRecord>,
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TriageError> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        TriageError::ReferenceDataLoad(path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str(&json).map_err(|e| {
        TriageError::ReferenceDataParse(path.display().to_string(), e.to_string())
    })
}

impl ReferenceTables {
    /// Load both tables from JSON arrays of records.
    pub fn load(resources_path: &Path, costs_path: &Path) -> Result<Self, TriageError> {
        let tables = Self {
            resources: read_table(resources_path)?,
            costs: read_table(costs_path)?,
        };

        let unmatched = tables.unrecognized_category_rows();
        if unmatched > 0 {
            tracing::warn!(
                rows = unmatched,
                "Reference rows with unrecognized treatment categories will never match"
            );
        }
        tracing::info!(
            resources = tables.resources.len(),
            costs = tables.costs.len(),
            "Reference tables loaded"
        );

        Ok(tables)
    }

    /// Rows whose category label is not one of the four treatment categories.
    pub fn unrecognized_category_rows(&self) -> usize {
        let bad = |label: &str| label.parse::<TreatmentCategory>().is_err();
        self.resources.iter().filter(|r| bad(&r.category)).count()
            + self.costs.iter().filter(|c| bad(&c.category)).count()
    }

    /// Small in-memory tables for tests (no file I/O).
    pub fn load_test() -> Self {
        let resource = |region: &str, facility: &str, category: &str, stock: u32| ResourceRecord {
            region: region.into(),
            facility: facility.into(),
            category: category.into(),
            available_stock: stock,
        };
        let cost = |region: &str,
                    facility: &str,
                    category: &str,
                    base_cost: f64,
                    nhif_covered: bool,
                    insurance_co_pay: f64,
                    out_of_pocket: f64| CostRecord {
            region: region.into(),
            facility: facility.into(),
            category: category.into(),
            base_cost,
            nhif_covered,
            insurance_co_pay,
            out_of_pocket,
        };

        Self {
            resources: vec![
                resource("Nairobi", "ClinicA", "Observation", 5),
                resource("Nairobi", "ClinicA", "Surgery", 0),
                resource("Nairobi", "ClinicA", "Medication", 12),
                resource("Mombasa", "Coast General", "Referral", 3),
                resource("Kisumu", "County Referral", "Surgery", 2),
            ],
            costs: vec![
                cost("Nairobi", "ClinicA", "Observation", 1000.0, true, 200.0, 800.0),
                cost("Nairobi", "ClinicA", "Surgery", 85000.0, true, 15000.0, 70000.0),
                cost("Mombasa", "Coast General", "Referral", 2500.0, false, 500.0, 2000.0),
                cost("Kisumu", "County Referral", "Surgery", 60000.0, true, 10000.0, 50000.0),
            ],
        }
    }
}
