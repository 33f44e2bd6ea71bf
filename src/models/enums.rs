use serde::{Deserialize, Serialize};

/// Treatment category assigned by the classifier.
///
/// The four clinical labels form a closed set produced by the fixed
/// code map in [`TreatmentCategory::from_code`]. `Unknown` is the sentinel
/// for codes outside that map: a valid outcome that never matches a
/// reference-table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreatmentCategory {
    Observation,
    Medication,
    Referral,
    Surgery,
    Unknown,
}

impl TreatmentCategory {
    /// The closed set of labels the classifier can map to.
    pub const KNOWN: [TreatmentCategory; 4] = [
        Self::Observation,
        Self::Medication,
        Self::Referral,
        Self::Surgery,
    ];

    /// Fixed code-to-label map. Any code outside 0..=3 is `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Observation,
            1 => Self::Medication,
            2 => Self::Referral,
            3 => Self::Surgery,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observation => "Observation",
            Self::Medication => "Medication",
            Self::Referral => "Referral",
            Self::Surgery => "Surgery",
            Self::Unknown => "Unknown",
        }
    }

    /// Lowercased label, the form reference-table keys are compared in.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Medication => "medication",
            Self::Referral => "referral",
            Self::Surgery => "surgery",
            Self::Unknown => "unknown",
        }
    }

    /// `false` only for the `Unknown` sentinel.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl std::fmt::Display for TreatmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a table label that is not one of the four treatment categories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized treatment category: {0}")]
pub struct UnrecognizedCategory(pub String);

impl std::str::FromStr for TreatmentCategory {
    type Err = UnrecognizedCategory;

    /// Parses a table label, case-insensitively. "Unknown" is not accepted:
    /// the sentinel is never a legitimate label in reference data.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::KNOWN
            .into_iter()
            .find(|c| c.key() == lower)
            .ok_or_else(|| UnrecognizedCategory(s.to_string()))
    }
}
