use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{CostRecord, TreatmentCategory};

use super::reference::TableKey;

/// Message carried by the `NotAvailable` marker on the wire.
pub const COST_NOT_AVAILABLE: &str = "Cost data not available for this facility/treatment";

/// Insurance-aware split of a treatment's price.
///
/// Exactly one of `co_pay` / `out_of_pocket` is taken from the record,
/// chosen by insurance status; the other is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub base_cost: f64,
    pub nhif: bool,
    pub co_pay: f64,
    pub out_of_pocket: f64,
}

/// Result of a cost lookup. `NotAvailable` is a domain answer
/// ("no pricing on file here"), distinct from a zero-cost breakdown.
#[derive(Debug, Clone, PartialEq)]
pub enum CostOutcome {
    Found(CostBreakdown),
    NotAvailable,
}

impl CostOutcome {
    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        match self {
            Self::Found(breakdown) => Some(breakdown),
            Self::NotAvailable => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Found serializes as the breakdown object, NotAvailable as `{ "error": ... }`.
impl Serialize for CostOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Found(breakdown) => breakdown.serialize(serializer),
            Self::NotAvailable => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", COST_NOT_AVAILABLE)?;
                map.end()
            }
        }
    }
}

/// Look up pricing for (region, facility, category) and split it by insurance.
///
/// Keys compare case-insensitively without trimming. When several rows
/// match, the first one in table order wins.
pub fn resolve_cost(
    region: &str,
    facility: &str,
    category: TreatmentCategory,
    has_insurance: bool,
    costs: &[CostRecord],
) -> CostOutcome {
    let Some(key) = TableKey::new(region, facility, category) else {
        return CostOutcome::NotAvailable;
    };

    match costs
        .iter()
        .find(|c| key.matches(&c.region, &c.facility, &c.category))
    {
        Some(row) => CostOutcome::Found(CostBreakdown {
            base_cost: row.base_cost,
            nhif: row.nhif_covered,
            co_pay: if has_insurance { row.insurance_co_pay } else { 0.0 },
            out_of_pocket: if has_insurance { 0.0 } else { row.out_of_pocket },
        }),
        None => CostOutcome::NotAvailable,
    }
}
