//! Metrics collection and exposition.
//!
//! # Metrics
//! - `executor_attempts_total` (counter): network attempts, including retries
//! - `executor_retries_total` (counter): retries by reason
//! - `executor_outcomes_total` (counter): settled calls by outcome
//! - `executor_request_duration_seconds` (histogram): call latency including backoff
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::RetryReason;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_attempt() {
    counter!("executor_attempts_total").increment(1);
}

pub fn record_retry(reason: RetryReason) {
    counter!("executor_retries_total", "reason" => reason.as_label()).increment(1);
}

/// Record a settled call. `outcome` is the final status label.
pub fn record_outcome(outcome: &'static str, started: Instant) {
    counter!("executor_outcomes_total", "outcome" => outcome).increment(1);
    histogram!("executor_request_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}
