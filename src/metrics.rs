/// Prometheus metrics for the gateway
///
/// - CCIP-Read requests by transport, function and status
/// - request latency
/// - record resolutions by record kind and outcome
/// - backend calls (directory, chain, profile) by outcome
/// - response signatures produced
use crate::error::{GatewayError, GatewayResult};
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// CCIP-Read requests by transport (get/post), inner function and HTTP status
    pub static ref CCIP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "ccip_requests_total",
        "Total number of CCIP-Read gateway requests",
        &["transport", "function", "status"]
    )
    .unwrap();

    /// Request latency in seconds, receipt to signed response
    pub static ref CCIP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "ccip_request_duration_seconds",
        "CCIP-Read request latencies in seconds",
        &["transport"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    /// Resolutions by record kind and whether a non-empty value was found
    pub static ref RESOLUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "resolutions_total",
        "Total number of record resolutions",
        &["record", "outcome"]
    )
    .unwrap();

    /// Backend calls by backend and outcome (hit/miss/error/timeout)
    pub static ref BACKEND_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "backend_calls_total",
        "Total number of backend calls",
        &["backend", "outcome"]
    )
    .unwrap();

    pub static ref SIGNATURES_TOTAL: IntCounter = register_int_counter!(
        "signatures_total",
        "Total number of signed gateway responses"
    )
    .unwrap();
}

/// Render metrics in Prometheus text format
pub fn render_metrics() -> GatewayResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| GatewayError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| GatewayError::Internal(format!("Metrics are not UTF-8: {}", e)))
}

/// Record a finished gateway request
pub fn record_request(transport: &str, function: &str, status: u16, duration: f64) {
    CCIP_REQUESTS_TOTAL
        .with_label_values(&[transport, function, &status.to_string()])
        .inc();
    CCIP_REQUEST_DURATION_SECONDS
        .with_label_values(&[transport])
        .observe(duration);
}

/// Record a resolution outcome
pub fn record_resolution(record: &str, hit: bool) {
    RESOLUTIONS_TOTAL
        .with_label_values(&[record, if hit { "hit" } else { "miss" }])
        .inc();
}

/// Record a backend call outcome
pub fn record_backend_call(backend: &str, outcome: &str) {
    BACKEND_CALLS_TOTAL
        .with_label_values(&[backend, outcome])
        .inc();
}

pub fn record_signature() {
    SIGNATURES_TOTAL.inc();
}
