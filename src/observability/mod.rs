//! # Observability
//!
//! Logging setup and Prometheus metrics for a sync run.

pub mod logging;
pub mod metrics;
