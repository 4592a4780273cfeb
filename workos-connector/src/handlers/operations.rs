//! Batch execution of WorkOS resource operations.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use validator::Validate;

use crate::services::{execute_batch, BatchError, OperationItem, WorkOsError, WorkOsTransport};
use crate::startup::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ExecuteRequest {
    #[validate(length(min = 1, max = 100, message = "between 1 and 100 items are allowed"))]
    pub items: Vec<OperationItem>,
    /// Substitute an error record for failed items instead of aborting.
    #[serde(default)]
    pub continue_on_fail: bool,
    /// Retry rate-limited (429) calls with exponential backoff.
    #[serde(default)]
    pub retry_rate_limited: bool,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub count: usize,
    pub results: Vec<Value>,
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        let message = err.to_string();
        match &err.source {
            source if source.is_rate_limited() => AppError::TooManyRequests {
                message,
                retry_after: None,
            },
            WorkOsError::InvalidInput(_) => AppError::BadRequest(message),
            _ => AppError::BadGateway(message),
        }
    }
}

/// Run every item in order and return the concatenated output records.
pub async fn execute_operations(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    payload.validate()?;

    tracing::info!(
        items = payload.items.len(),
        continue_on_fail = payload.continue_on_fail,
        retry_rate_limited = payload.retry_rate_limited,
        "Executing WorkOS operations"
    );

    let transport: &dyn WorkOsTransport = if payload.retry_rate_limited {
        state.retrying.as_ref()
    } else {
        state.workos.as_ref()
    };

    let results = execute_batch(
        transport,
        &payload.items,
        state.client_id.as_deref(),
        payload.continue_on_fail,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "WorkOS batch aborted");
        AppError::from(e)
    })?;

    Ok(Json(ExecuteResponse {
        count: results.len(),
        results,
    }))
}
