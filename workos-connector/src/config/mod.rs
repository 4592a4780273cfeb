use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use service_core::utils::{RetryConfig, DEFAULT_TOLERANCE_SECONDS};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.workos.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub workos: WorkOsConfig,
    pub webhook: WebhookConfig,
    pub retry: RetrySettings,
}

/// Credentials and endpoint for the WorkOS REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkOsConfig {
    pub api_key: Secret<String>,
    /// Only needed by the authenticate operations.
    pub client_id: Option<String>,
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Signing secret. `None` disables verification entirely.
    pub secret: Option<Secret<String>>,
    pub verify_signature: bool,
    pub tolerance_seconds: u64,
    /// Event types that produce a trigger. Empty means every event.
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl WorkOsConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl WebhookConfig {
    /// Secret to verify against, if verification is on and a secret is present.
    pub fn signing_secret(&self) -> Option<&str> {
        if !self.verify_signature {
            return None;
        }
        self.secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())
    }

    /// Whether an event type passes the configured allow-list.
    pub fn accepts_event(&self, event_type: &str) -> bool {
        self.events.is_empty() || self.events.iter().any(|e| e == event_type)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            verify_signature: true,
            tolerance_seconds: DEFAULT_TOLERANCE_SECONDS,
            events: Vec::new(),
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        RetryConfig {
            max_retries: settings.max_retries,
            base_delay: Duration::from_millis(settings.base_delay_ms),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = env::var("WORKOS_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("WORKOS_API_KEY must be set")))?;

        let webhook_secret = optional_env("WORKOS_WEBHOOK_SECRET").map(Secret::new);

        Ok(Self {
            common,
            service_name: get_env("SERVICE_NAME", "workos-connector"),
            log_level: get_env("LOG_LEVEL", "info"),
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
            workos: WorkOsConfig {
                api_key: Secret::new(api_key),
                client_id: optional_env("WORKOS_CLIENT_ID"),
                api_base_url: get_env("WORKOS_API_BASE_URL", DEFAULT_API_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
                request_timeout_seconds: parse_env("WORKOS_REQUEST_TIMEOUT_SECONDS", 30)?,
            },
            webhook: WebhookConfig {
                secret: webhook_secret,
                verify_signature: parse_env("WORKOS_VERIFY_SIGNATURE", true)?,
                tolerance_seconds: parse_env(
                    "WORKOS_SIGNATURE_TOLERANCE_SECONDS",
                    DEFAULT_TOLERANCE_SECONDS,
                )?,
                events: parse_list(&get_env("WORKOS_WEBHOOK_EVENTS", "")),
            },
            retry: RetrySettings {
                max_retries: parse_env("WORKOS_RETRY_MAX_RETRIES", 3)?,
                base_delay_ms: parse_env("WORKOS_RETRY_BASE_DELAY_MS", 1000)?,
            },
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        None => Ok(default),
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
