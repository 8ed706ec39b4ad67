//! Metrics collection and exposition.
//!
//! # Metrics
//! - `signup_relay_requests_total` (counter): inbound requests by outcome, status
//! - `signup_relay_upstream_duration_seconds` (histogram): upstream call latency

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled request. `start` is set when an upstream call was made.
pub fn record_request(outcome: &'static str, status: u16, start: Option<Instant>) {
    metrics::counter!(
        "signup_relay_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);

    if let Some(start) = start {
        metrics::histogram!("signup_relay_upstream_duration_seconds", "outcome" => outcome)
            .record(start.elapsed().as_secs_f64());
    }
}
