//! HTTP boundary around the compiler.
//!
//! `POST /api/export/terraform` validates the envelope, runs generation and
//! shapes the response; `GET /health` is informational.

use crate::config::GeneratorConfig;
use crate::error::ExportError;
use crate::export::{export_terraform, ErrorBody, ExportResponse};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone, Default)]
pub struct ExportState {
    config: Arc<GeneratorConfig>,
}

impl ExportState {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Diagram compiler backend is running".to_string(),
    })
}

type Rejection = (StatusCode, Json<ErrorBody>);

/// POST /api/export/terraform
///
/// Any content type is accepted; a body that is not JSON is a 400 with the
/// usual `{ error, message }` shape.
async fn export(
    State(state): State<ExportState>,
    body: Bytes,
) -> Result<Json<ExportResponse>, Rejection> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| reject(&ExportError::from(e)))?;

    let node_count = body.get("nodes").and_then(Value::as_array).map_or(0, Vec::len);
    let edge_count = body.get("edges").and_then(Value::as_array).map_or(0, Vec::len);
    tracing::info!(
        "[SERVER] Received export request ({} nodes, {} edges)",
        node_count,
        edge_count
    );

    let response = export_terraform(&body, &state.config).map_err(|e| reject(&e))?;
    tracing::info!(
        "[SERVER] Terraform code generated ({} lines)",
        response.stats.lines
    );
    Ok(Json(response))
}

fn reject(err: &ExportError) -> Rejection {
    let status = if err.is_client_error() {
        tracing::warn!("[SERVER] Rejected export request: {}", err);
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("[SERVER] Error generating Terraform code: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorBody::from(err)))
}

/// The export routes without middleware.
pub fn create_export_router(state: ExportState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/export/terraform", post(export))
        .with_state(state)
}

/// The export routes with permissive CORS and request tracing.
pub fn create_app(config: GeneratorConfig) -> Router {
    create_export_router(ExportState::new(config))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    async fn call(request: Request<Body>) -> (StatusCode, Value) {
        let response = create_app(GeneratorConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/export/terraform")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn export_returns_terraform_and_stats() {
        let (status, body) = call(post_json(json!({
            "nodes": [{ "id": "v", "type": "vpc", "data": { "label": "VPC", "cidr": "10.0.0.0/16" } }]
        })))
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["nodes"], 1);
        assert_eq!(body["stats"]["edges"], 0);
        assert!(body["terraform"]
            .as_str()
            .unwrap()
            .contains("resource \"aws_vpc\" \"vpc\""));
    }

    #[tokio::test]
    async fn missing_nodes_is_bad_request() {
        let (status, body) = call(post_json(json!({ "edges": [] }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid input: nodes array is required" }));
    }

    #[tokio::test]
    async fn malformed_node_is_internal_error() {
        let (status, body) = call(post_json(json!({ "nodes": [{ "id": 7 }] }))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate Terraform code");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn non_json_body_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/export/terraform")
            .body(Body::from("nodes=1"))
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_is_still_accepted() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/export/terraform")
            .body(Body::from(json!({ "nodes": [] }).to_string()))
            .unwrap();
        let (status, body) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["nodes"], 0);
    }
}
