//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sweeper_accounts_total` (counter): accounts processed, by outcome
//! - `sweeper_account_duration_seconds` (histogram): time spent per account
//! - `sweeper_runs_total` (counter): completed runs
//! - `sweeper_last_run_succeeded` / `sweeper_last_run_failed` (gauges)
//!
//! A sweep is a batch job, so instead of serving a scrape endpoint the
//! rendered registry can be written to a textfile for node_exporter.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::path::Path;
use std::time::Duration;

/// Install the global Prometheus recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record one processed account.
pub fn record_account(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("sweeper_accounts_total", "outcome" => outcome).increment(1);
    metrics::histogram!("sweeper_account_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record a completed run.
pub fn record_run(succeeded: usize, failed: usize) {
    metrics::counter!("sweeper_runs_total").increment(1);
    metrics::gauge!("sweeper_last_run_succeeded").set(succeeded as f64);
    metrics::gauge!("sweeper_last_run_failed").set(failed as f64);
}

/// Write the current registry in Prometheus text format.
pub fn write_textfile(handle: &PrometheusHandle, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, handle.render())
}
