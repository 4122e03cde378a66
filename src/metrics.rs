//! Prometheus exposure for the relay's counters and gauges.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the relay's series.
    /// Call once, before the pipeline is constructed, so its counters
    /// register against this recorder.
    pub fn init() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");
        describe_counter!("relay_fetch_total", "Successful fetch-next commands.");
        describe_counter!("relay_fetch_failures_total", "Failed fetch-next commands.");
        describe_counter!("relay_commit_total", "Successful commits.");
        describe_counter!("relay_commit_failures_total", "Failed commits.");
        describe_gauge!("relay_ledger_entries", "Identifiers recorded in the ledger.");
        Self { handle }
    }

    /// Router exposing `/metrics` in Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route("/metrics", get(move || std::future::ready(handle.render())))
    }
}
