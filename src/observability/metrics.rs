//! # Metrics
//!
//! Prometheus metrics for a sync run.
//!
//! A run is short-lived, so nothing is served over HTTP. Instead the registry
//! can be written to a textfile at the end of the run for the node-exporter
//! textfile collector to pick up.
//!
//! ## Metrics Exposed
//!
//! - `secret_sync_secrets_created_total` - Secrets created during the run
//! - `secret_sync_secrets_existing_total` - Secrets that already existed (version added)
//! - `secret_sync_secret_failures_total` - Secrets skipped because of an error
//! - `secret_sync_store_operations_total` - Secret Manager calls by operation
//! - `secret_sync_store_operation_errors_total` - Failed Secret Manager calls by operation
//! - `secret_sync_store_operation_duration_seconds` - Duration of Secret Manager calls

use anyhow::{Context, Result};
use prometheus::{Encoder, HistogramVec, IntCounter, IntCounterVec, Registry, TextEncoder};
use std::path::Path;
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static SECRETS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_sync_secrets_created_total",
        "Total number of secrets created in Secret Manager",
    )
    .expect("Failed to create SECRETS_CREATED_TOTAL metric - this should never happen")
});

static SECRETS_EXISTING_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_sync_secrets_existing_total",
        "Total number of secrets that already existed and received a new version",
    )
    .expect("Failed to create SECRETS_EXISTING_TOTAL metric - this should never happen")
});

static SECRET_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "secret_sync_secret_failures_total",
        "Total number of secrets skipped because of an error",
    )
    .expect("Failed to create SECRET_FAILURES_TOTAL metric - this should never happen")
});

static STORE_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_sync_store_operations_total",
            "Total number of Secret Manager operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create STORE_OPERATIONS_TOTAL metric - this should never happen")
});

static STORE_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "secret_sync_store_operation_errors_total",
            "Total number of failed Secret Manager operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create STORE_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static STORE_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "secret_sync_store_operation_duration_seconds",
            "Duration of Secret Manager operations in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create STORE_OPERATION_DURATION metric - this should never happen")
});

/// Register all metrics with the registry
///
/// Safe to call more than once; metrics that are already registered are skipped.
///
/// # Errors
/// Returns an error if a metric cannot be registered for a reason other than
/// already being registered
pub fn register_metrics() -> Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SECRETS_CREATED_TOTAL.clone()),
        Box::new(SECRETS_EXISTING_TOTAL.clone()),
        Box::new(SECRET_FAILURES_TOTAL.clone()),
        Box::new(STORE_OPERATIONS_TOTAL.clone()),
        Box::new(STORE_OPERATION_ERRORS_TOTAL.clone()),
        Box::new(STORE_OPERATION_DURATION.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e).context("Failed to register metric"),
        }
    }

    Ok(())
}

pub fn increment_secrets_created() {
    SECRETS_CREATED_TOTAL.inc();
}

pub fn increment_secrets_existing() {
    SECRETS_EXISTING_TOTAL.inc();
}

pub fn increment_secret_failures() {
    SECRET_FAILURES_TOTAL.inc();
}

/// Record a completed Secret Manager call
pub fn record_store_operation(operation: &str, duration: f64) {
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .inc();
    STORE_OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}

/// Record a failed Secret Manager call
pub fn increment_store_operation_errors(operation: &str) {
    STORE_OPERATION_ERRORS_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Render the registry in Prometheus text exposition format
///
/// # Errors
/// Returns an error if encoding fails
pub fn gather_text() -> Result<String> {
    let families = REGISTRY.gather();
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Encoded metrics are not valid UTF-8")
}

/// Write the registry to `path`
///
/// The file is written next to the target and renamed into place so the
/// textfile collector never reads a partial file.
///
/// # Errors
/// Returns an error if the metrics cannot be encoded or the file cannot be
/// written or moved into place
pub fn write_textfile(path: &Path) -> Result<()> {
    let text = gather_text()?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    std::fs::write(tmp, text)
        .with_context(|| format!("Failed to write metrics to {}", tmp.display()))?;
    std::fs::rename(tmp, path)
        .with_context(|| format!("Failed to move metrics into {}", path.display()))?;
    Ok(())
}
