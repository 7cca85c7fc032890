// SPDX-License-Identifier: Apache-2.0

//! Hand-rolled Prometheus text exposition: request counts by route and
//! status, latency percentiles per route.

use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const METRIC_SUBSYSTEM: &str = "lanyard";

#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        if let Ok(mut counts) = self.counts.lock() {
            *counts
                .entry((route.to_string(), status.as_u16()))
                .or_insert(0) += 1;
        }
        if let Ok(mut latency_ns) = self.latency_ns.lock() {
            let samples = latency_ns.entry(route.to_string()).or_default();
            samples.push(latency.as_nanos() as u64);
            // Bounded sample window per route.
            if samples.len() > 4096 {
                let excess = samples.len() - 4096;
                samples.drain(0..excess);
            }
        }
    }

    fn snapshot_counts(&self) -> Vec<((String, u16), u64)> {
        let mut out: Vec<_> = self
            .counts
            .lock()
            .map(|counts| counts.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default();
        out.sort();
        out
    }

    fn snapshot_latency(&self) -> Vec<(String, Vec<u64>)> {
        let mut out: Vec<_> = self
            .latency_ns
            .lock()
            .map(|latency| latency.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        out.sort();
        out
    }
}

fn percentile_ns(values: &[u64], pct: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut v = values.to_vec();
    v.sort_unstable();
    let idx = ((v.len() as f64 - 1.0) * pct).round() as usize;
    v[idx]
}

pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let mut body = String::new();
    for ((route, status), count) in state.metrics.snapshot_counts() {
        body.push_str(&format!(
            "{METRIC_SUBSYSTEM}_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}\n"
        ));
    }
    for (route, samples) in state.metrics.snapshot_latency() {
        for (label, pct) in [("p50", 0.50), ("p95", 0.95), ("p99", 0.99)] {
            let seconds = percentile_ns(&samples, pct) as f64 / 1_000_000_000.0;
            body.push_str(&format!(
                "{METRIC_SUBSYSTEM}_request_latency_seconds{{route=\"{route}\",quantile=\"{label}\"}} {seconds:.9}\n"
            ));
        }
    }
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
