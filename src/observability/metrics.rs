//! Metrics collection and exposition.
//!
//! # Metrics
//! - `qwen_proxy_requests_total` (counter): requests by operation, status
//! - `qwen_proxy_request_duration_seconds` (histogram): latency by operation
//!
//! Without an installed recorder the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "qwen_proxy_requests_total";
pub const REQUEST_DURATION: &str = "qwen_proxy_request_duration_seconds";

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION, "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
