use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder once per process.
///
/// Later calls are no-ops, so several applications can be built in one
/// process (integration tests do this).
pub fn init_metrics() {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new().install_recorder();
        match handle {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(error = %e, "Global recorder already installed, metrics are local only");
                PrometheusBuilder::new().build_recorder().handle()
            }
        }
    });
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count a webhook delivery by its outcome.
pub fn record_webhook_delivery(outcome: &'static str) {
    metrics::counter!("workos_webhook_deliveries_total", "outcome" => outcome).increment(1);
}
