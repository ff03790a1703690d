//! Metrics recording implementation using Prometheus.

use prometheus::proto::{LabelPair, MetricFamily};
#[cfg(target_os = "linux")]
use prometheus::process_collector::ProcessCollector;
use prometheus::{
    CounterVec, DEFAULT_BUCKETS, Encoder, HistogramVec, Opts, Registry, TextEncoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
};
use std::sync::Arc;

use crate::error::ServerError;

pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Trait for recording per-request metrics.
///
/// Implementations synchronise internally; callers never lock.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Counts one handled request.
    fn record_request(&self, method: &str, path: &str, status: u16);

    /// Records how long a request took, in seconds.
    fn record_request_duration(&self, method: &str, path: &str, duration_secs: f64);
}

/// Prometheus metrics collector.
///
/// Each instance owns its registry, so tests can build an isolated one.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    http_request_duration_seconds: HistogramVec,
    http_requests_total: CounterVec,
}

impl Metrics {
    /// Creates a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Result<Self, ServerError> {
        let registry = Arc::new(Registry::new());

        let http_request_duration_seconds = register_histogram_vec_with_registry!(
            HTTP_REQUEST_DURATION_SECONDS,
            "The HTTP request latencies in seconds.",
            &["method", "path"],
            DEFAULT_BUCKETS.to_vec(),
            registry.clone()
        )?;

        let http_requests_total = register_counter_vec_with_registry!(
            Opts::new(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests made."),
            &["method", "path", "status"],
            registry.clone()
        )?;

        // process_cpu_seconds_total, process_resident_memory_bytes, ...
        #[cfg(target_os = "linux")]
        registry.register(Box::new(ProcessCollector::for_self()))?;

        Ok(Metrics {
            registry,
            http_request_duration_seconds,
            http_requests_total,
        })
    }

    /// Snapshot of every registered metric family.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> Result<String, ServerError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ServerError::Metrics(prometheus::Error::Msg(e.to_string())))
    }

    /// Sum of `http_requests_total` across every label combination.
    pub fn requests_total(&self) -> f64 {
        self.family(HTTP_REQUESTS_TOTAL)
            .map(|family| {
                family
                    .get_metric()
                    .iter()
                    .map(|m| m.get_counter().get_value())
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Number of duration samples observed for a `{method, path}` pair.
    pub fn duration_sample_count(&self, method: &str, path: &str) -> u64 {
        let Some(family) = self.family(HTTP_REQUEST_DURATION_SECONDS) else {
            return 0;
        };
        family
            .get_metric()
            .iter()
            .find(|m| {
                let labels = m.get_label();
                has_label(labels, "method", method) && has_label(labels, "path", path)
            })
            .map(|m| m.get_histogram().get_sample_count())
            .unwrap_or(0)
    }

    fn family(&self, name: &str) -> Option<MetricFamily> {
        self.gather().into_iter().find(|f| f.get_name() == name)
    }
}

fn has_label(labels: &[LabelPair], name: &str, value: &str) -> bool {
    labels
        .iter()
        .any(|l| l.get_name() == name && l.get_value() == value)
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, method: &str, path: &str, status: u16) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status.as_str()])
            .inc();
    }

    fn record_request_duration(&self, method: &str, path: &str, duration_secs: f64) {
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }
}
