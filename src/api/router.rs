//! Triage API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Triage routes are nested under `/triage/`.
//!
//! Layers (outermost → innermost):
//! 1. `Cache-Control: no-store` → 2. Access log

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::triage::TriageEngine;

/// Build the triage API router over a loaded engine.
pub fn triage_api_router(engine: Arc<dyn TriageEngine>) -> Router {
    let ctx = ApiContext::new(engine);

    let triage = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/growth", post(endpoints::triage::growth))
        .route("/recommendation", post(endpoints::triage::recommendation))
        .with_state(ctx);

    Router::new()
        .route("/", get(endpoints::health::root))
        .nest("/triage", triage)
        .fallback(endpoints::health::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(axum::middleware::from_fn(middleware::audit::log_access)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::triage::fixtures::{engine_with, FailingModel, FixedModel};
    use crate::triage::{DefaultTriageEngine, ReferenceTables};

    fn app(growth: f64, treatment_code: f64) -> Router {
        triage_api_router(Arc::new(engine_with(growth, treatment_code)))
    }

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "age": 45,
            "menopause_status": "post",
            "cyst_size": 6.2,
            "cyst_growth_rate": 0.3,
            "ca_125_level": 40,
            "ultrasound_features": "simple",
            "reported_symptoms": "none",
            "region": "Nairobi",
            "facility": "ClinicA",
            "has_insurance": true
        })
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn root_returns_welcome() {
        let response = app(0.0, 0.0)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], endpoints::health::WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn health_reports_table_sizes() {
        let response = app(0.0, 0.0)
            .oneshot(Request::get("/triage/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["resource_records"], 5);
        assert_eq!(json["cost_records"], 4);
    }

    #[tokio::test]
    async fn recommendation_worked_example() {
        let response = app(0.0, 0.0)
            .oneshot(post_json("/triage/recommendation", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Cache-Control").unwrap(),
            "no-store"
        );
        assert!(response.headers().contains_key(middleware::audit::REQUEST_ID_HEADER));

        let json = body_json(response).await;
        assert_eq!(
            json,
            serde_json::json!({
                "recommended_treatment": "Observation",
                "available": true,
                "cost_breakdown": {"base_cost": 1000.0, "nhif": true, "co_pay": 200.0, "out_of_pocket": 0.0}
            })
        );
    }

    #[tokio::test]
    async fn recommendation_unknown_code() {
        let response = app(0.0, 99.0)
            .oneshot(post_json("/triage/recommendation", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["recommended_treatment"], "Unknown");
        assert_eq!(json["available"], false);
        assert_eq!(
            json["cost_breakdown"]["error"],
            crate::triage::cost::COST_NOT_AVAILABLE
        );
    }

    #[tokio::test]
    async fn growth_returns_rounded_prediction() {
        let response = app(1.23456, 0.0)
            .oneshot(post_json("/triage/growth", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "predicted_growth": 1.23 }));
    }

    #[tokio::test]
    async fn growth_too_large_to_round_is_422() {
        let response = app(1e307, 0.0)
            .oneshot(post_json("/triage/growth", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "PREDICTION_FAILED");
        assert_eq!(json["error"]["stage"], "growth");
    }

    #[tokio::test]
    async fn missing_field_is_400_naming_field() {
        let mut body = sample_body();
        body.as_object_mut().unwrap().remove("ca_125_level");
        let response = app(0.0, 0.0)
            .oneshot(post_json("/triage/recommendation", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["field"], "ca_125_level");
    }

    #[tokio::test]
    async fn wrong_type_is_400() {
        let mut body = sample_body();
        body["age"] = serde_json::json!("forty-five");
        let response = app(0.0, 0.0)
            .oneshot(post_json("/triage/growth", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(json["error"]["field"], "age");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let response = app(0.0, 0.0)
            .oneshot(post_json("/triage/recommendation", "{not json".into()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn classifier_failure_is_422_classification_stage() {
        let engine = DefaultTriageEngine::new(
            Box::new(FixedModel(0.0)),
            Box::new(FailingModel),
            ReferenceTables::load_test(),
        );
        let response = triage_api_router(Arc::new(engine))
            .oneshot(post_json("/triage/recommendation", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["stage"], "classification");
    }

    #[tokio::test]
    async fn unknown_route_is_404_envelope() {
        let response = app(0.0, 0.0)
            .oneshot(Request::get("/triage/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get("Cache-Control").unwrap(),
            "no-store"
        );
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn identical_requests_get_identical_answers() {
        let router = app(0.0, 2.0);
        let first = router
            .clone()
            .oneshot(post_json("/triage/recommendation", sample_body().to_string()))
            .await
            .unwrap();
        let second = router
            .oneshot(post_json("/triage/recommendation", sample_body().to_string()))
            .await
            .unwrap();
        assert_eq!(body_json(first).await, body_json(second).await);
    }
}
