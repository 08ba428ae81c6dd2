//! Metrics collection and exposition.
//!
//! # Metrics
//! - `hub_deliveries_total` (counter): notifications by target and outcome
//! - `hub_channels_provisioned_total` (counter): channel creations by outcome
//! - `hub_formatters_loaded_total` (counter): formatter modules by outcome
//! - `hub_auth_rejections_total` (counter): requests refused by the auth check

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Where a notification ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// A topic channel.
    Topic,
    /// The default channel, no slug given.
    Default,
    /// The default channel, because the slug was unknown.
    Fallback,
}

impl DeliveryTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryTarget::Topic => "topic",
            DeliveryTarget::Default => "default",
            DeliveryTarget::Fallback => "fallback",
        }
    }
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_delivery(target: DeliveryTarget, success: bool) {
    metrics::counter!(
        "hub_deliveries_total",
        "target" => target.as_str(),
        "outcome" => outcome(success)
    )
    .increment(1);
}

pub fn record_provision(success: bool) {
    metrics::counter!("hub_channels_provisioned_total", "outcome" => outcome(success)).increment(1);
}

pub fn record_formatter_load(success: bool) {
    metrics::counter!("hub_formatters_loaded_total", "outcome" => outcome(success)).increment(1);
}

pub fn record_auth_rejection() {
    metrics::counter!("hub_auth_rejections_total").increment(1);
}
