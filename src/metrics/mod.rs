//! Metrics collection and exposition for Prometheus.
//!
//! This module provides the process-wide request counter and duration histogram.

mod recorder;

pub use recorder::{Metrics, MetricsRecorder, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};
