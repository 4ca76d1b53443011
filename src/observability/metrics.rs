//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lottery_rpc_requests_total` (counter): RPC calls by method, outcome
//! - `lottery_rpc_duration_seconds` (histogram): RPC latency including failover
//! - `lottery_actions_total` (counter): user actions by kind, outcome
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one RPC method call.
pub fn record_rpc(method: &'static str, outcome: &'static str, started: Instant) {
    counter!("lottery_rpc_requests_total", "method" => method, "outcome" => outcome).increment(1);
    histogram!("lottery_rpc_duration_seconds", "method" => method)
        .record(started.elapsed().as_secs_f64());
}

/// Record one user-triggered action (entry, prepare, send, lookup).
pub fn record_action(action: &'static str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("lottery_actions_total", "action" => action, "outcome" => outcome).increment(1);
}
