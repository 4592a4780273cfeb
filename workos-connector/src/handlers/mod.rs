//! HTTP handlers for the WorkOS connector.

pub mod operations;
pub mod webhook;

use crate::services::get_metrics;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "workos-connector",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
