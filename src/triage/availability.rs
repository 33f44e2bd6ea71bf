use crate::models::{ResourceRecord, TreatmentCategory};

use super::reference::TableKey;

/// `true` iff some row matches (region, facility, category) case-insensitively
/// and has stock left. `Unknown` never matches.
pub fn check_availability(
    region: &str,
    facility: &str,
    category: TreatmentCategory,
    resources: &[ResourceRecord],
) -> bool {
    let Some(key) = TableKey::new(region, facility, category) else {
        return false;
    };
    resources
        .iter()
        .any(|r| r.available_stock > 0 && key.matches(&r.region, &r.facility, &r.category))
}
