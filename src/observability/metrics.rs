//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_connections_accepted_total` (counter)
//! - `proxy_transactions_total` (counter): by `outcome`
//! - `proxy_bytes_relayed_total` (counter): response bytes delivered to clients
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_accept() {
    metrics::counter!("proxy_connections_accepted_total").increment(1);
}

pub fn record_transaction(outcome: &'static str) {
    metrics::counter!("proxy_transactions_total", "outcome" => outcome).increment(1);
}

pub fn record_bytes_relayed(bytes: u64) {
    metrics::counter!("proxy_bytes_relayed_total").increment(bytes);
}
