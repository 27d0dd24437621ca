//! Prometheus metrics for the chat relay
//!
//! Tracks:
//! - Relay requests by output mode and outcome
//! - Upstream call latency by outcome
//!
//! Exposed via `GET /metrics` in Prometheus text format. Recording failures
//! are logged by callers and never fail a request.

use crate::relay::OutputMode;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// How a relay request ended, as a bounded label set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Upstream produced text
    Replied,
    /// Upstream succeeded without usable text; fallback reply sent
    Fallback,
    /// Message missing or blank; no upstream call made
    Rejected,
    /// Upstream or internal failure
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Replied => "replied",
            Outcome::Fallback => "fallback",
            Outcome::Rejected => "message_missing",
            Outcome::Failed => "server_error",
        }
    }
}

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    upstream_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance with its own registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 2 modes × 4 outcomes
        let requests_total = IntCounterVec::new(
            Opts::new(
                "relay_requests_total",
                "Total number of relay requests by output mode and outcome",
            ),
            &["mode", "outcome"],
        )?;

        let upstream_duration = HistogramVec::new(
            HistogramOpts::new(
                "relay_upstream_duration_seconds",
                "Latency of upstream completion calls in seconds",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["outcome"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            upstream_duration,
        })
    }

    /// Count one finished relay request
    pub fn record_request(
        &self,
        mode: OutputMode,
        outcome: Outcome,
    ) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[mode.as_str(), outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Observe one upstream call
    pub fn record_upstream_duration(
        &self,
        success: bool,
        seconds: f64,
    ) -> Result<(), prometheus::Error> {
        let outcome = if success { "ok" } else { "error" };
        self.upstream_duration
            .get_metric_with_label_values(&[outcome])?
            .observe(seconds);
        Ok(())
    }

    /// Current count for a mode/outcome pair
    pub fn request_count(&self, mode: OutputMode, outcome: Outcome) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[mode.as_str(), outcome.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("metrics output is not UTF-8: {}", e)))
    }
}
