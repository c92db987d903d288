//! Shared bookkeeping for Secret Manager calls: span attributes and metrics.

use crate::observability::metrics;
use std::time::{Duration, Instant};
use tracing::Span;

/// Records metrics and span attributes for a successful operation
pub fn record_success_metrics(span: &Span, operation: &str, duration: Duration) {
    span.record("operation.duration_ms", duration_ms(duration));
    span.record("operation.success", true);
    metrics::record_store_operation(operation, duration.as_secs_f64());
}

/// Records metrics and span attributes for a failed operation
pub fn record_error_metrics(span: &Span, operation: &str, error_message: &str, duration: Duration) {
    span.record("operation.duration_ms", duration_ms(duration));
    span.record("operation.success", false);
    span.record("error.message", error_message);
    metrics::record_store_operation(operation, duration.as_secs_f64());
    metrics::increment_store_operation_errors(operation);
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Tracks one Secret Manager call from start to outcome
#[derive(Debug)]
pub struct OperationTracker {
    start: Instant,
    span: Span,
    operation: &'static str,
}

impl OperationTracker {
    /// Start tracking; `span` must declare the `operation.*` and `error.message` fields
    pub fn new(span: Span, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            span,
            operation,
        }
    }

    pub fn record_success(&self) {
        record_success_metrics(&self.span, self.operation, self.start.elapsed());
    }

    pub fn record_error(&self, error_message: &str) {
        record_error_metrics(
            &self.span,
            self.operation,
            error_message,
            self.start.elapsed(),
        );
    }
}
