//! WorkOS REST transport.
//!
//! Issues one authenticated call per request and normalizes failures into
//! [`WorkOsError`]. Retrying is not done here; wrap a transport in
//! [`RetryingTransport`] to opt in.

use crate::config::WorkOsConfig;
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use service_core::utils::{retry_with_backoff, RetryConfig, RetryableError};
use std::collections::BTreeMap;
use thiserror::Error;

/// Query parameters. Later inserts override earlier ones.
pub type Query = BTreeMap<String, String>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkOsError {
    /// Non-2xx response carrying a structured WorkOS error body.
    #[error("{message} (status: {status}, code: {code}{})", entity_suffix(.entity_id))]
    Api {
        status: u16,
        code: String,
        message: String,
        entity_id: Option<String>,
    },

    /// Non-2xx response without a recognizable error body.
    #[error("{message} (status: {status})")]
    Status { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("Request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Local input rejected before any network call.
    #[error("{0}")]
    InvalidInput(String),
}

fn entity_suffix(entity_id: &Option<String>) -> String {
    entity_id
        .as_ref()
        .map(|id| format!(", entity id: {}", id))
        .unwrap_or_default()
}

impl WorkOsError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        WorkOsError::InvalidInput(message.into())
    }

    /// HTTP status returned by WorkOS, if there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            WorkOsError::Api { status, .. } | WorkOsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(StatusCode::TOO_MANY_REQUESTS.as_u16())
    }

    /// Human readable message without status decoration.
    pub fn message(&self) -> String {
        match self {
            WorkOsError::Api { message, .. } | WorkOsError::Status { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }

    /// Normalize a non-2xx response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            code: Option<String>,
            error: Option<String>,
            error_description: Option<String>,
            entity_id: Option<String>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) if err.message.is_some() || err.code.is_some() || err.error.is_some() => {
                WorkOsError::Api {
                    status,
                    code: err
                        .code
                        .or(err.error)
                        .unwrap_or_else(|| "unknown_error".to_string()),
                    message: err
                        .message
                        .or(err.error_description)
                        .unwrap_or_else(|| "An unknown error occurred".to_string()),
                    entity_id: err.entity_id,
                }
            }
            _ => WorkOsError::Status {
                status,
                message: if body.trim().is_empty() {
                    StatusCode::from_u16(status)
                        .ok()
                        .and_then(|s| s.canonical_reason())
                        .unwrap_or("Unknown error")
                        .to_string()
                } else {
                    body.to_string()
                },
            },
        }
    }
}

impl RetryableError for WorkOsError {
    fn is_retryable(&self) -> bool {
        self.is_rate_limited()
    }
}

impl From<reqwest::Error> for WorkOsError {
    fn from(err: reqwest::Error) -> Self {
        WorkOsError::Transport(err.to_string())
    }
}

/// One authenticated WorkOS call.
#[async_trait]
pub trait WorkOsTransport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &Query,
    ) -> Result<Value, WorkOsError>;
}

/// Whether a body should be sent at all: only non-GET calls with content.
fn has_content(method: &Method, body: Option<&Value>) -> bool {
    if *method == Method::GET {
        return false;
    }
    match body {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// reqwest-backed WorkOS client.
#[derive(Clone)]
pub struct WorkOsClient {
    client: Client,
    config: WorkOsConfig,
}

impl WorkOsClient {
    pub fn new(config: WorkOsConfig) -> Result<Self, WorkOsError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("workos-connector/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    pub fn client_id(&self) -> Option<&str> {
        self.config.client_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[async_trait]
impl WorkOsTransport for WorkOsClient {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &Query,
    ) -> Result<Value, WorkOsError> {
        let url = format!("{}{}", self.config.api_base_url, endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.config.api_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(query);

        if let Some(body) = body.filter(|_| has_content(&method, body)) {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(method = %method, endpoint = %endpoint, error = %e, "WorkOS request failed");
            WorkOsError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        metrics::counter!(
            "workos_api_requests_total",
            "method" => method.to_string(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        tracing::debug!(
            method = %method,
            endpoint = %endpoint,
            status = status.as_u16(),
            "WorkOS response"
        );

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|e| WorkOsError::Decode(e.to_string()));
        }

        let err = WorkOsError::from_response(status.as_u16(), &text);
        tracing::warn!(
            method = %method,
            endpoint = %endpoint,
            status = status.as_u16(),
            error = %err,
            "WorkOS returned an error"
        );
        Err(err)
    }
}

/// Decorator that retries rate-limited (429) calls with exponential backoff.
pub struct RetryingTransport<T> {
    inner: T,
    config: RetryConfig,
}

impl<T> RetryingTransport<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

#[async_trait]
impl<T: WorkOsTransport> WorkOsTransport for RetryingTransport<T> {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &Query,
    ) -> Result<Value, WorkOsError> {
        let inner = &self.inner;
        retry_with_backoff(&self.config, endpoint, move || {
            inner.request(method.clone(), endpoint, body, query)
        })
        .await
    }
}
