//! Prometheus metrics for the request counter and HTTP instrumentation.
//!
//! Each [`ServiceMetrics`] owns its own Prometheus recorder instead of
//! installing a process-global one, so every recording goes through
//! [`metrics::with_local_recorder`]. Two service instances in one process
//! (as in tests) never observe each other's samples.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Counter,
    Unit,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::debug;

use crate::config::MetricsMode;

// === Metric Name Constants ===

/// Home route request counter metric name.
pub const METRIC_HELLO_REQUESTS: &str = "hello_api_requests_total";
/// HTTP requests by route and status metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";
/// Exporter info gauge metric name.
pub const METRIC_INFO: &str = "hello_api_info";

/// Latency histogram buckets, in seconds.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Content type of the Prometheus text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Metrics registry owned by one running service.
#[derive(Clone)]
pub struct ServiceMetrics {
    mode: MetricsMode,
    recorder: Arc<PrometheusRecorder>,
}

impl ServiceMetrics {
    /// Build a registry for the given mode and describe its metric families.
    pub fn new(mode: MetricsMode) -> Result<Self, metrics_exporter_prometheus::BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_HTTP_REQUEST_DURATION.to_string()),
                LATENCY_BUCKETS,
            )?
            .build_recorder();

        let metrics = Self {
            mode,
            recorder: Arc::new(recorder),
        };
        metrics.describe();
        Ok(metrics)
    }

    fn describe(&self) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            describe_counter!(METRIC_HELLO_REQUESTS, "Total requests to Hello API");

            if self.mode == MetricsMode::Middleware {
                describe_counter!(
                    METRIC_HTTP_REQUESTS,
                    "Total number of HTTP requests by method, path and status"
                );
                describe_histogram!(
                    METRIC_HTTP_REQUEST_DURATION,
                    Unit::Seconds,
                    "HTTP request latency in seconds"
                );
                describe_gauge!(METRIC_INFO, "Hello API exporter information");
                gauge!(METRIC_INFO, "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            }
        });

        debug!(mode = %self.mode, "Metrics initialized");
    }

    /// Mode this registry was built for.
    pub fn mode(&self) -> MetricsMode {
        self.mode
    }

    /// Register the home route counter. It is exported at 0 until first hit.
    pub fn request_counter(&self) -> RequestCounter {
        let exported = metrics::with_local_recorder(self.recorder.as_ref(), || {
            counter!(METRIC_HELLO_REQUESTS)
        });
        RequestCounter {
            total: Arc::new(AtomicU64::new(0)),
            exported,
        }
    }

    /// Record one completed HTTP request.
    pub fn record_http_request(
        &self,
        method: &str,
        path: &str,
        status: StatusCode,
        elapsed: Duration,
    ) {
        let method = method.to_string();
        let path = path.to_string();
        let status = status.as_u16().to_string();

        metrics::with_local_recorder(self.recorder.as_ref(), || {
            counter!(
                METRIC_HTTP_REQUESTS,
                "method" => method.clone(),
                "path" => path.clone(),
                "status" => status.clone()
            )
            .increment(1);
            histogram!(
                METRIC_HTTP_REQUEST_DURATION,
                "method" => method,
                "path" => path,
                "status" => status
            )
            .record(elapsed.as_secs_f64());
        });
    }

    /// Render all samples in the Prometheus text format.
    pub fn render(&self) -> String {
        self.recorder.handle().render()
    }

    /// Handle for periodic upkeep of histogram buffers.
    pub fn handle(&self) -> PrometheusHandle {
        self.recorder.handle()
    }
}

/// Process-wide count of home route invocations.
///
/// Cloning shares the underlying counter.
#[derive(Clone)]
pub struct RequestCounter {
    total: Arc<AtomicU64>,
    exported: Counter,
}

impl RequestCounter {
    /// Increment by one and return the new total.
    pub fn increment(&self) -> u64 {
        self.exported.increment(1);
        self.total.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current total.
    pub fn get(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
