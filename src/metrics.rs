// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the Route 53 ingress controller.
//!
//! All metrics carry the `route53_ingress_` prefix and are registered in
//! [`METRICS_REGISTRY`], which `main` exposes on `/metrics`.
//!
//! # Metrics Categories
//!
//! - **Event Metrics** - Ingress watch events and callback durations
//! - **Record Metrics** - Record set mutations by action and outcome
//! - **Hostname Metrics** - Skipped hostnames and tracked reference counts
//! - **Error Metrics** - Classified remote-call failures
//!
//! # Example
//!
//! ```rust,no_run
//! use route53_ingress::metrics::record_event;
//!
//! record_event("create", std::time::Duration::from_millis(120));
//! ```

use crate::error_classifier::Severity;
use crate::record_set::ChangeAction;
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all controller metrics
const METRICS_NAMESPACE: &str = "route53_ingress";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Event Metrics
// ============================================================================

/// Total number of engine callbacks by event type
///
/// Labels:
/// - `event`: `create`, `update` or `delete`
pub static EVENTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_events_total"),
        "Total number of ingress events handled by event type",
    );
    let counter = CounterVec::new(opts, &["event"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of engine callbacks in seconds
///
/// Labels:
/// - `event`: `create`, `update` or `delete`
pub static EVENT_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_event_duration_seconds"),
        "Duration of ingress event callbacks in seconds by event type",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["event"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

/// Total number of errors surfaced by the ingress watch stream
pub static WATCH_ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_watch_errors_total"),
        "Total number of errors returned by the ingress watch stream",
    );
    let counter = CounterVec::new(opts, &["resource_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Record Metrics
// ============================================================================

/// Total number of record set changes submitted
///
/// Labels:
/// - `action`: `UPSERT` or `DELETE`
/// - `outcome`: `success`, or the severity of the classified failure
pub static RECORD_CHANGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_changes_total"),
        "Total number of record set changes by action and outcome",
    );
    let counter = CounterVec::new(opts, &["action", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Hostname Metrics
// ============================================================================

/// Total number of hostnames skipped
///
/// Labels:
/// - `reason`: `empty` or `not_allowed`
pub static SKIPPED_HOSTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_skipped_hosts_total"),
        "Total number of hostnames skipped by reason",
    );
    let counter = CounterVec::new(opts, &["reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Number of hostnames with a reference count entry
pub static TRACKED_HOSTNAMES: LazyLock<Gauge> = LazyLock::new(|| {
    let gauge = Gauge::new(
        format!("{METRICS_NAMESPACE}_tracked_hostnames"),
        "Number of hostnames currently tracked by the reference counter",
    )
    .unwrap();
    METRICS_REGISTRY.register(Box::new(gauge.clone())).unwrap();
    gauge
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of classified remote-call errors
///
/// Labels:
/// - `severity`: `ignorable`, `log_only` or `severe`
pub static CLASSIFIED_ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_classified_errors_total"),
        "Total number of remote-call errors by classified severity",
    );
    let counter = CounterVec::new(opts, &["severity"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record one handled ingress event
///
/// # Arguments
/// * `event` - Callback that ran (`create`, `update`, `delete`)
/// * `duration` - Time spent inside the callback
pub fn record_event(event: &str, duration: Duration) {
    EVENTS_TOTAL.with_label_values(&[event]).inc();
    EVENT_DURATION_SECONDS
        .with_label_values(&[event])
        .observe(duration.as_secs_f64());
}

/// Record an error returned by the watch stream
pub fn record_watch_error(resource_type: &str) {
    WATCH_ERRORS_TOTAL.with_label_values(&[resource_type]).inc();
}

/// Record a submitted record set change
///
/// # Arguments
/// * `action` - The change action
/// * `outcome` - `success` or a [`Severity`] label
pub fn record_change(action: ChangeAction, outcome: &str) {
    RECORD_CHANGES_TOTAL
        .with_label_values(&[action.as_str(), outcome])
        .inc();
}

/// Record a hostname the engine declined to manage
pub fn record_skipped_host(reason: &str) {
    SKIPPED_HOSTS_TOTAL.with_label_values(&[reason]).inc();
}

/// Publish the number of tracked hostnames
#[allow(clippy::cast_precision_loss)]
pub fn set_tracked_hostnames(count: usize) {
    TRACKED_HOSTNAMES.set(count as f64);
}

/// Record a classified error
pub fn record_classified_error(severity: Severity) {
    CLASSIFIED_ERRORS_TOTAL
        .with_label_values(&[severity.as_str()])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
