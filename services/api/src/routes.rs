use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use compliance_engine::engine::{
    DecisionResult, Jurisdiction, Product, RouteId, Stage, ValidationOrchestrator,
    ValidationRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    pub(crate) jurisdiction: Jurisdiction,
    pub(crate) product: Product,
    pub(crate) stage: Stage,
    #[serde(default)]
    pub(crate) facts: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub(crate) selected_route: Option<RouteId>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RuleSetEntry {
    pub(crate) jurisdiction: Jurisdiction,
    pub(crate) product: Product,
}

pub(crate) fn compliance_router(orchestrator: Arc<ValidationOrchestrator>) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/compliance/validate",
            axum::routing::post(validate_endpoint),
        )
        .route(
            "/api/v1/compliance/rulesets",
            axum::routing::get(rulesets_endpoint),
        )
        .layer(Extension(orchestrator))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn validate_endpoint(
    Extension(orchestrator): Extension<Arc<ValidationOrchestrator>>,
    Json(payload): Json<ValidateRequest>,
) -> Json<DecisionResult> {
    let ValidateRequest {
        jurisdiction,
        product,
        stage,
        facts,
        selected_route,
        today,
    } = payload;

    // The engine itself never consults the wall clock; the boundary fills in
    // the reference date only when the caller omitted one.
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let request = ValidationRequest {
        answers: facts,
        jurisdiction,
        product,
        stage,
        selected_route,
        today,
    };

    Json(orchestrator.validate(&request))
}

pub(crate) async fn rulesets_endpoint(
    Extension(orchestrator): Extension<Arc<ValidationOrchestrator>>,
) -> Json<Vec<RuleSetEntry>> {
    let entries = orchestrator
        .registry()
        .configured()
        .into_iter()
        .map(|(jurisdiction, product)| RuleSetEntry {
            jurisdiction,
            product,
        })
        .collect();
    Json(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use compliance_engine::engine::RuleRegistry;
    use tower::ServiceExt;

    fn router() -> axum::Router {
        let registry = RuleRegistry::builtin().expect("builtin rule sets load");
        compliance_router(Arc::new(ValidationOrchestrator::new(registry)))
    }

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = to_bytes(body, usize::MAX).await.expect("body read");
        serde_json::from_slice(&bytes).expect("body is json")
    }

    fn post_validate(payload: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/compliance/validate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn validate_blocks_section_21_for_unprotected_deposit() {
        let payload = json!({
            "jurisdiction": "england",
            "product": "notice_only",
            "stage": "generate",
            "today": "2026-01-15",
            "facts": {
                "deposit_taken": true,
                "deposit_protected": false
            }
        });

        let response = router()
            .oneshot(post_validate(payload))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        let blocked: Vec<&str> = body["blocked_routes"]
            .as_array()
            .expect("blocked_routes is an array")
            .iter()
            .map(|route| route.as_str().expect("route ids are strings"))
            .collect();
        assert!(blocked.contains(&"section_21"));

        let codes: Vec<&str> = body["blocking_issues"]
            .as_array()
            .expect("blocking_issues is an array")
            .iter()
            .map(|issue| issue["code"].as_str().expect("issue codes are strings"))
            .collect();
        assert!(codes.contains(&"E21-DEPOSIT-UNPROTECTED"));
    }

    #[tokio::test]
    async fn validate_reports_unsupported_jurisdiction() {
        let payload = json!({
            "jurisdiction": "northern_ireland",
            "product": "notice_only",
            "stage": "draft",
            "today": "2026-01-15",
            "facts": {}
        });

        let response = router()
            .oneshot(post_validate(payload))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        assert!(body["unsupported"].is_object());
        assert!(body["allowed_routes"]
            .as_array()
            .expect("allowed_routes is an array")
            .is_empty());
    }

    #[tokio::test]
    async fn rulesets_lists_builtin_combinations() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/compliance/rulesets")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response.into_body()).await;
        let entries = body.as_array().expect("rulesets is an array");
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().any(|entry| {
            entry["jurisdiction"] == "scotland" && entry["product"] == "notice_only"
        }));
    }
}
