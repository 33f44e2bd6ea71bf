//! Shared types for the triage API layer.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::ApiError;
use crate::models::{PatientPayload, PatientProfile, ValidationError};
use crate::triage::TriageEngine;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub engine: Arc<dyn TriageEngine>,
}

impl ApiContext {
    pub fn new(engine: Arc<dyn TriageEngine>) -> Self {
        Self { engine }
    }
}

/// Turn a raw JSON extraction into a validated profile.
///
/// Decode failures (bad JSON, wrong types) and missing or out-of-range
/// fields are both rejected here, before any model is touched.
pub fn validated_profile(
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<PatientProfile, ApiError> {
    let Json(payload) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(err) => decode_error(err.body_text()),
        other => ValidationError::Malformed(other.body_text()),
    })?;
    Ok(PatientProfile::try_from(payload)?)
}

/// Attribute a typed decode failure to its field.
///
/// axum renders these as `<prefix>: <path>: <serde message>`; a top-level
/// path is omitted, so anything that does not name a profile field stays
/// `Malformed`.
fn decode_error(text: String) -> ValidationError {
    let attributed = text
        .split_once(": ")
        .and_then(|(_, detail)| detail.split_once(": "))
        .and_then(|(path, reason)| {
            PatientPayload::field_named(path).map(|field| ValidationError::Invalid {
                field,
                reason: reason.to_string(),
            })
        });
    attributed.unwrap_or(ValidationError::Malformed(text))
}
