//! Application startup and lifecycle management.

use crate::config::Config;
use crate::handlers;
use crate::models::TriggerEvent;
use crate::services::triggers::DEFAULT_TRIGGER_CAPACITY;
use crate::services::{
    init_metrics, spawn_trigger_logger, RetryingTransport, TriggerDispatcher, WorkOsClient,
    WorkOsTransport,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use service_core::utils::RetryConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Plain transport: one call per request.
    pub workos: Arc<dyn WorkOsTransport>,
    /// Same client wrapped with 429 backoff, used when a batch opts in.
    pub retrying: Arc<dyn WorkOsTransport>,
    pub client_id: Option<String>,
    pub triggers: TriggerDispatcher,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/webhook", post(handlers::webhook::receive_webhook))
        .route("/operations", post(handlers::operations::execute_operations))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    http_port: u16,
    listener: TcpListener,
    router: Router,
    trigger_receiver: Option<mpsc::Receiver<TriggerEvent>>,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let client = WorkOsClient::new(config.workos.clone()).map_err(|e| {
            tracing::error!("Failed to create WorkOS client: {}", e);
            AppError::ConfigError(anyhow::anyhow!("Failed to create WorkOS client: {}", e))
        })?;
        tracing::info!(base_url = %client.base_url(), "WorkOS client initialized");

        if !config.webhook.verify_signature {
            tracing::warn!("Webhook signature verification is disabled");
        } else if config.webhook.signing_secret().is_none() {
            tracing::warn!(
                "WORKOS_WEBHOOK_SECRET not configured - webhook deliveries are accepted without verification"
            );
        }

        let retry_config = RetryConfig::from(&config.retry);
        let client_id = client.client_id().map(str::to_string);
        let (triggers, trigger_receiver) = TriggerDispatcher::channel(DEFAULT_TRIGGER_CAPACITY);

        let state = AppState {
            config: config.clone(),
            workos: Arc::new(client.clone()),
            retrying: Arc::new(RetryingTransport::new(client, retry_config)),
            client_id,
            triggers,
        };

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let http_port = listener.local_addr()?.port();

        tracing::info!("WorkOS connector: HTTP on port {}", http_port);

        Ok(Self {
            http_port,
            listener,
            router: router(state),
            trigger_receiver: Some(trigger_receiver),
        })
    }

    /// Get the HTTP port the server is listening on.
    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    /// Take the consuming end of the trigger queue.
    ///
    /// If nobody takes it, `run_until_stopped` attaches a logging consumer.
    pub fn take_trigger_receiver(&mut self) -> Option<mpsc::Receiver<TriggerEvent>> {
        self.trigger_receiver.take()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        if let Some(receiver) = self.trigger_receiver {
            spawn_trigger_logger(receiver);
        }

        axum::serve(self.listener, self.router).await.map_err(|e| {
            tracing::error!("HTTP server error: {}", e);
            e
        })
    }
}
