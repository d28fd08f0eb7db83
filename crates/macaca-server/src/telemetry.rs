//! Logging and metrics initialisation

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const REQUESTS_TOTAL: &str = "macaca_requests_total";
pub const ERRORS_TOTAL: &str = "macaca_errors_total";
pub const INFERENCE_LATENCY_US: &str = "macaca_inference_latency_us";

/// Initialize tracing/logging
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("macaca=debug,macaca_server=debug,macaca_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("macaca=info,macaca_server=info,macaca_classifiers=info,tower_http=warn")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of analyze requests");
    metrics::describe_counter!(ERRORS_TOTAL, "Total number of failed analyze requests by kind");
    metrics::describe_histogram!(
        INFERENCE_LATENCY_US,
        metrics::Unit::Microseconds,
        "Decode plus forward pass latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
