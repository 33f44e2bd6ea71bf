use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request-boundary shape of a patient profile.
///
/// Every field is optional here so that a missing field is reported by
/// name rather than as an opaque decode failure. Convert with
/// `PatientProfile::try_from` before anything reaches the triage engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientPayload {
    pub age: Option<i64>,
    pub menopause_status: Option<String>,
    pub cyst_size: Option<f64>,
    pub cyst_growth_rate: Option<f64>,
    pub ca_125_level: Option<f64>,
    pub ultrasound_features: Option<String>,
    pub reported_symptoms: Option<String>,
    pub region: Option<String>,
    pub facility: Option<String>,
    pub has_insurance: Option<bool>,
}

impl PatientPayload {
    /// Wire names of every profile field.
    pub const FIELDS: [&'static str; 10] = [
        "age",
        "menopause_status",
        "cyst_size",
        "cyst_growth_rate",
        "ca_125_level",
        "ultrasound_features",
        "reported_symptoms",
        "region",
        "facility",
        "has_insurance",
    ];

    /// The static name of a profile field, if `name` is one.
    pub fn field_named(name: &str) -> Option<&'static str> {
        Self::FIELDS.iter().copied().find(|field| *field == name)
    }
}

/// A validated patient profile. Created per request, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfile {
    pub age: u32,
    pub menopause_status: String,
    /// Millimetres.
    pub cyst_size: f64,
    pub cyst_growth_rate: f64,
    pub ca_125_level: f64,
    pub ultrasound_features: String,
    pub reported_symptoms: String,
    pub region: String,
    pub facility: String,
    pub has_insurance: bool,
}

/// Input rejected at the request boundary. Never reaches a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Malformed request body: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Name of the offending field, when the error is attributable to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing(field) | Self::Invalid { field, .. } => Some(field),
            Self::Malformed(_) => None,
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Non-empty check only. The value is kept as sent: lookups compare
/// region/facility without trimming.
fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    let text = required(value, field)?;
    if text.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(text)
}

fn finite(value: Option<f64>, field: &'static str) -> Result<f64, ValidationError> {
    let v = required(value, field)?;
    if !v.is_finite() {
        return Err(invalid(field, "must be a finite number"));
    }
    Ok(v)
}

impl TryFrom<PatientPayload> for PatientProfile {
    type Error = ValidationError;

    fn try_from(payload: PatientPayload) -> Result<Self, Self::Error> {
        let age = required(payload.age, "age")?;
        let age = u32::try_from(age).map_err(|_| invalid("age", "must be a non-negative integer"))?;

        let menopause_status = required_text(payload.menopause_status, "menopause_status")?;

        let cyst_size = finite(payload.cyst_size, "cyst_size")?;
        if cyst_size <= 0.0 {
            return Err(invalid("cyst_size", "must be greater than zero"));
        }

        let cyst_growth_rate = finite(payload.cyst_growth_rate, "cyst_growth_rate")?;

        let ca_125_level = finite(payload.ca_125_level, "ca_125_level")?;
        if ca_125_level < 0.0 {
            return Err(invalid("ca_125_level", "must not be negative"));
        }

        Ok(Self {
            age,
            menopause_status,
            cyst_size,
            cyst_growth_rate,
            ca_125_level,
            ultrasound_features: required_text(payload.ultrasound_features, "ultrasound_features")?,
            reported_symptoms: required_text(payload.reported_symptoms, "reported_symptoms")?,
            region: required_text(payload.region, "region")?,
            facility: required_text(payload.facility, "facility")?,
            has_insurance: required(payload.has_insurance, "has_insurance")?,
        })
    }
}
