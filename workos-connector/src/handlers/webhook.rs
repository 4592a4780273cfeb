//! Inbound WorkOS webhook deliveries.
//!
//! Callers only ever see 200 or 401 with a short plain-text reason. The
//! payload is not looked at until the signature has been checked.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use service_core::utils::{check_signature, SignatureError};

use crate::models::TriggerEvent;
use crate::services::record_webhook_delivery;
use crate::startup::AppState;

pub const SIGNATURE_HEADER: &str = "workos-signature";

pub const EVENT_RECEIVED: &str = "Event received";
pub const EVENT_IGNORED: &str = "Event ignored";
pub const MISSING_SIGNATURE: &str = "Unauthorized: Missing signature";
pub const INVALID_SIGNATURE_FORMAT: &str = "Unauthorized: Invalid signature format";
pub const TIMESTAMP_TOO_OLD: &str = "Unauthorized: Timestamp too old";
pub const INVALID_SIGNATURE: &str = "Unauthorized: Invalid signature";

fn rejection(err: &SignatureError) -> (&'static str, &'static str) {
    match err {
        SignatureError::Malformed => ("malformed_signature", INVALID_SIGNATURE_FORMAT),
        SignatureError::Expired => ("stale_timestamp", TIMESTAMP_TOO_OLD),
        SignatureError::Mismatch | SignatureError::InvalidKey => {
            ("invalid_signature", INVALID_SIGNATURE)
        }
    }
}

fn unauthorized(outcome: &'static str, reason: &'static str) -> Response {
    record_webhook_delivery(outcome);
    (StatusCode::UNAUTHORIZED, reason).into_response()
}

fn ignored(outcome: &'static str) -> Response {
    record_webhook_delivery(outcome);
    (StatusCode::OK, EVENT_IGNORED).into_response()
}

/// Verify, filter and hand off one delivery.
///
/// The body is taken as raw bytes: the digest covers exactly what was sent.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let webhook = &state.config.webhook;

    if let Some(secret) = webhook.signing_secret() {
        let signature = match headers.get(SIGNATURE_HEADER) {
            None => None,
            Some(value) => match value.to_str() {
                Ok(s) => Some(s.trim()).filter(|s| !s.is_empty()),
                Err(_) => {
                    tracing::warn!("Webhook signature header is not valid text");
                    return unauthorized("malformed_signature", INVALID_SIGNATURE_FORMAT);
                }
            },
        };

        let Some(signature) = signature else {
            tracing::warn!("Webhook delivery without signature header");
            return unauthorized("missing_signature", MISSING_SIGNATURE);
        };

        if let Err(e) = check_signature(&body, signature, secret, webhook.tolerance_seconds) {
            let (outcome, reason) = rejection(&e);
            tracing::warn!(error = %e, "Rejected webhook delivery");
            return unauthorized(outcome, reason);
        }
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload @ Value::Object(_)) => payload,
        Ok(_) => {
            tracing::warn!("Webhook body is not a JSON object");
            return ignored("invalid_payload");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Webhook body is not valid JSON");
            return ignored("invalid_payload");
        }
    };

    let trigger = match TriggerEvent::from_payload(payload) {
        Ok(trigger) => trigger,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook envelope could not be decoded");
            return ignored("invalid_payload");
        }
    };

    let event_type = trigger.event.clone().unwrap_or_default();
    if !webhook.accepts_event(&event_type) {
        tracing::debug!(event = %event_type, "Event not in allow-list");
        return ignored("filtered");
    }

    // Acknowledged even when the hand-off fails.
    if let Err(e) = state.triggers.dispatch(trigger) {
        tracing::error!(event = %event_type, error = %e, "Dropped webhook event");
        record_webhook_delivery("dropped");
        return (StatusCode::OK, EVENT_RECEIVED).into_response();
    }

    tracing::info!(event = %event_type, "Webhook event received");
    record_webhook_delivery("accepted");
    (StatusCode::OK, EVENT_RECEIVED).into_response()
}
