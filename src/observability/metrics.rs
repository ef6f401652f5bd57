//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pipeline_submissions_total` (counter): send attempts by outcome
//! - `pipeline_error_reports_total` (counter): reports by severity, disposition
//! - `pipeline_log_entries_total` (counter): emitted log entries by level

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::observability::logger::LogLevel;
use crate::observability::reporter::Severity;

/// Install the Prometheus exporter on `addr`. Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(outcome: &'static str) {
    metrics::counter!("pipeline_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_error_report(severity: Severity, disposition: &'static str) {
    metrics::counter!(
        "pipeline_error_reports_total",
        "severity" => severity.as_str(),
        "disposition" => disposition
    )
    .increment(1);
}

pub fn record_log_entry(level: LogLevel) {
    metrics::counter!("pipeline_log_entries_total", "level" => level.as_str()).increment(1);
}
