//! Call-metrics interface consumed by the layers around the engine
//!
//! The core never records metrics itself; binaries and service wrappers pass
//! a sink handle explicitly and record one entry per engine call.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

/// Outcome of one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Success,
    Error,
}

/// Sink accepting one record per engine call.
pub trait MetricsSink: Send + Sync {
    fn record(&self, endpoint: &str, duration: Duration, status: CallStatus);
}

#[derive(Debug, Default, Clone)]
struct EndpointAccum {
    calls: u64,
    errors: u64,
    total_ms: f64,
}

/// Per-endpoint stats in a [`MetricsSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStats {
    pub endpoint: String,
    pub calls: u64,
    pub errors: u64,
    pub avg_duration_ms: f64,
}

/// Point-in-time view of everything a sink has recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests_served: u64,
    pub endpoint_stats: Vec<EndpointStats>,
}

/// In-process sink keeping per-endpoint call stats.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    inner: Mutex<HashMap<String, EndpointAccum>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with endpoints in name order.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.lock().expect("metrics mutex poisoned");
        let mut endpoint_stats: Vec<EndpointStats> = inner
            .iter()
            .map(|(endpoint, accum)| EndpointStats {
                endpoint: endpoint.clone(),
                calls: accum.calls,
                errors: accum.errors,
                avg_duration_ms: if accum.calls > 0 {
                    accum.total_ms / accum.calls as f64
                } else {
                    0.0
                },
            })
            .collect();
        endpoint_stats.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));

        MetricsSnapshot {
            requests_served: inner.values().map(|a| a.calls).sum(),
            endpoint_stats,
        }
    }
}

impl MetricsSink for InMemoryMetrics {
    fn record(&self, endpoint: &str, duration: Duration, status: CallStatus) {
        let mut inner = self.inner.lock().expect("metrics mutex poisoned");
        let accum = inner.entry(endpoint.to_string()).or_default();
        accum.calls += 1;
        if status == CallStatus::Error {
            accum.errors += 1;
        }
        accum.total_ms += duration.as_secs_f64() * 1000.0;
    }
}
