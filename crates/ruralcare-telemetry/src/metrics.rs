//! Prometheus-backed counters for dashboard refresh and submission cycles.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Labels are limited to a fixed outcome set so cardinality stays bounded.

use std::convert::TryFrom;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Outcome label recorded against cycle counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle completed and state was applied.
    Success,
    /// The cycle failed and state was left untouched.
    Failure,
}

impl CycleOutcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Prometheus-backed metrics registry shared by the coordinator and CLI.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    refresh_cycles_total: IntCounterVec,
    report_submissions_total: IntCounterVec,
    alerts_generated_total: IntCounter,
    last_refresh_duration_ms: IntGauge,
}

/// Snapshot of the counters for status output and tests.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Refresh cycles that replaced the view state.
    pub refresh_success_total: u64,
    /// Refresh cycles that failed and left state untouched.
    pub refresh_failure_total: u64,
    /// Report submissions accepted by the backend.
    pub submit_success_total: u64,
    /// Report submissions rejected locally or by the backend.
    pub submit_failure_total: u64,
    /// Alerts produced by the alert feed.
    pub alerts_generated_total: u64,
    /// Duration of the most recent refresh cycle (ms).
    pub last_refresh_duration_ms: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let refresh_cycles_total = IntCounterVec::new(
            Opts::new(
                "dashboard_refresh_cycles_total",
                "Five-endpoint refresh cycles by outcome",
            ),
            &["outcome"],
        )?;
        let report_submissions_total = IntCounterVec::new(
            Opts::new(
                "dashboard_report_submissions_total",
                "Health report submissions by outcome",
            ),
            &["outcome"],
        )?;
        let alerts_generated_total = IntCounter::with_opts(Opts::new(
            "dashboard_alerts_generated_total",
            "Alerts appended to the rolling alert list",
        ))?;
        let last_refresh_duration_ms = IntGauge::with_opts(Opts::new(
            "dashboard_last_refresh_duration_ms",
            "Wall time of the most recent refresh cycle (ms)",
        ))?;

        registry.register(Box::new(refresh_cycles_total.clone()))?;
        registry.register(Box::new(report_submissions_total.clone()))?;
        registry.register(Box::new(alerts_generated_total.clone()))?;
        registry.register(Box::new(last_refresh_duration_ms.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                refresh_cycles_total,
                report_submissions_total,
                alerts_generated_total,
                last_refresh_duration_ms,
            }),
        })
    }

    /// Record a finished refresh cycle.
    pub fn record_refresh(&self, outcome: CycleOutcome, elapsed: Duration) {
        self.inner
            .refresh_cycles_total
            .with_label_values(&[outcome.label()])
            .inc();
        self.inner
            .last_refresh_duration_ms
            .set(Self::duration_to_ms(elapsed));
    }

    /// Record a finished report submission.
    pub fn record_submission(&self, outcome: CycleOutcome) {
        self.inner
            .report_submissions_total
            .with_label_values(&[outcome.label()])
            .inc();
    }

    /// Increment the generated alert counter.
    pub fn inc_alert(&self) {
        self.inner.alerts_generated_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let refresh = |outcome: CycleOutcome| {
            self.inner
                .refresh_cycles_total
                .with_label_values(&[outcome.label()])
                .get()
        };
        let submit = |outcome: CycleOutcome| {
            self.inner
                .report_submissions_total
                .with_label_values(&[outcome.label()])
                .get()
        };
        MetricsSnapshot {
            refresh_success_total: refresh(CycleOutcome::Success),
            refresh_failure_total: refresh(CycleOutcome::Failure),
            submit_success_total: submit(CycleOutcome::Success),
            submit_failure_total: submit(CycleOutcome::Failure),
            alerts_generated_total: self.inner.alerts_generated_total.get(),
            last_refresh_duration_ms: self.inner.last_refresh_duration_ms.get(),
        }
    }

    /// Convert a duration to milliseconds saturating at `i64::MAX`.
    pub(crate) fn duration_to_ms(duration: Duration) -> i64 {
        i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
    }
}
