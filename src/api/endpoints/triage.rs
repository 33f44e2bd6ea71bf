//! Triage endpoints.
//!
//! - `POST /triage/growth`: predicted cyst growth
//! - `POST /triage/recommendation`: treatment, availability and cost

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{validated_profile, ApiContext};
use crate::models::PatientPayload;
use crate::triage::{DecisionResult, GrowthPrediction};

/// `POST /triage/growth`
pub async fn growth(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<Json<GrowthPrediction>, ApiError> {
    let profile = validated_profile(payload)?;
    let prediction = ctx.engine.predict(&profile)?;
    Ok(Json(prediction))
}

/// `POST /triage/recommendation`
pub async fn recommendation(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<Json<DecisionResult>, ApiError> {
    let profile = validated_profile(payload)?;
    let decision = ctx.engine.recommend(&profile)?;
    Ok(Json(decision))
}
