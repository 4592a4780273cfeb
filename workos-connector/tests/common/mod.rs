#![allow(dead_code)]

use hmac::{Hmac, Mac};
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use sha2::Sha256;
use tokio::sync::mpsc;
use workos_connector::config::{Config, RetrySettings, WebhookConfig, WorkOsConfig};
use workos_connector::models::TriggerEvent;
use workos_connector::startup::Application;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "sk_test_connector";
pub const TEST_CLIENT_ID: &str = "client_test_123";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Stand-in for the WorkOS API.
    pub workos: MockServer,
    pub triggers: mpsc::Receiver<TriggerEvent>,
    pub client: reqwest::Client,
}

pub fn test_config(api_base_url: &str) -> Config {
    Config {
        common: CoreConfig {
            port: 0, // Random port
            host: "127.0.0.1".to_string(),
        },
        service_name: "workos-connector-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        workos: WorkOsConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            client_id: Some(TEST_CLIENT_ID.to_string()),
            api_base_url: api_base_url.to_string(),
            request_timeout_seconds: 5,
        },
        webhook: WebhookConfig {
            secret: Some(Secret::new(TEST_WEBHOOK_SECRET.to_string())),
            ..WebhookConfig::default()
        },
        retry: RetrySettings {
            max_retries: 3,
            base_delay_ms: 10,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with a tweaked configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> Self {
        let workos = MockServer::start().await;

        let mut config = test_config(&workos.uri());
        customize(&mut config);

        let mut app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let triggers = app
            .take_trigger_receiver()
            .expect("Trigger receiver already taken");

        let port = app.http_port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            workos,
            triggers,
            client,
        }
    }

    pub async fn post_webhook(&self, body: &str, signature: Option<&str>) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/webhook", self.address))
            .header("content-type", "application/json")
            .body(body.to_string());

        if let Some(signature) = signature {
            request = request.header("workos-signature", signature);
        }

        request.send().await.expect("Failed to execute request")
    }

    pub async fn post_operations(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/operations", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Build a `workos-signature` header value the way WorkOS does.
pub fn sign(body: &str, timestamp: i64, secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(format!("{}.{}", timestamp, body).as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
