//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define mock server metrics (requests, latency, store mutations)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `mock_requests_total` (counter): total requests by method, status
//! - `mock_request_duration_seconds` (histogram): latency distribution
//! - `mock_store_mutations_total` (counter): store writes by operation
//! - `mock_collection_records` (gauge): records per collection
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and start its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "mock_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "mock_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a write to the mock store.
pub fn record_store_mutation(operation: &'static str) {
    counter!("mock_store_mutations_total", "operation" => operation).increment(1);
}

/// Record the current size of a collection.
pub fn record_collection_size(collection: &str, records: usize) {
    gauge!("mock_collection_records", "collection" => collection.to_string()).set(records as f64);
}
