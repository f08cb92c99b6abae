//! Prometheus metrics for ingress observability.
//!
//! Metrics are exposed via a dedicated HTTP listener (default port 9090,
//! `METRICS_PORT=0` disables). Recording is a no-op until the exporter is
//! installed, so library code can record unconditionally.
//!
//! # Available Metrics
//!
//! - `ingress_requests_total` - Requests handled (labels: method, status)
//! - `ingress_rate_limited_total` - Requests rejected by the rate limiter
//! - `ingress_failures_total` - Failures translated to error envelopes
//!   (labels: kind, status)

use std::net::SocketAddr;

use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_TOTAL: &str = "ingress_requests_total";
    pub const RATE_LIMITED_TOTAL: &str = "ingress_rate_limited_total";
    pub const FAILURES_TOTAL: &str = "ingress_failures_total";
}

/// Initialize the Prometheus metrics exporter.
///
/// # Errors
///
/// Returns a message if the exporter cannot be installed (e.g. the port is
/// already bound).
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::REQUESTS_TOTAL,
        "Total number of HTTP requests handled by the ingress pipeline"
    );
    describe_counter!(
        names::RATE_LIMITED_TOTAL,
        "Total number of requests rejected by the rate limiter"
    );
    describe_counter!(
        names::FAILURES_TOTAL,
        "Total number of failures translated into error envelopes"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16) {
    counter!(names::REQUESTS_TOTAL, "method" => method.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Record one rate-limit rejection.
pub fn record_rate_limited() {
    counter!(names::RATE_LIMITED_TOTAL).increment(1);
}

/// Record one failure reaching the error translator.
pub fn record_failure(kind: &str, status: u16) {
    counter!(names::FAILURES_TOTAL, "kind" => kind.to_string(), "status" => status.to_string())
        .increment(1);
}
