//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::models::ValidationError;
use crate::triage::{PredictionStage, TriageError};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Prediction failed at {stage} stage: {message}")]
    Prediction {
        stage: PredictionStage,
        message: String,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_FAILED",
                    message: err.to_string(),
                    field: err.field(),
                    stage: None,
                },
            ),
            ApiError::Prediction { stage, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "PREDICTION_FAILED",
                    message: message.clone(),
                    field: None,
                    stage: Some(stage.as_str()),
                },
            ),
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND",
                    message: detail.clone(),
                    field: None,
                    stage: None,
                },
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorDetail {
                        code: "INTERNAL",
                        message: "An internal error occurred".to_string(),
                        field: None,
                        stage: None,
                    },
                )
            }
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Prediction { stage, source } => ApiError::Prediction {
                stage,
                message: format!("Prediction error: {source}"),
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}
