//! Root greeting and health check endpoints.

use axum::extract::State;
use axum::http::Uri;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;

pub const WELCOME_MESSAGE: &str = "Welcome to GROOT, AI platform for Ovarian Cyst Management";

#[derive(Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// `GET /`: service greeting.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub resource_records: usize,
    pub cost_records: usize,
}

/// `GET /triage/health`: liveness plus the size of the loaded tables.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let summary = ctx.engine.summary();
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        resource_records: summary.resource_records,
        cost_records: summary.cost_records,
    })
}

/// Fallback for unmatched routes, so 404s use the error envelope too.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
