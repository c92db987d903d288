//! # Logging
//!
//! Tracing subscriber setup shared by both binaries.
//!
//! Logs go to stderr; stdout is reserved for the per-secret status lines.
//! `RUST_LOG` wins over the `--log-level` flag when both are set.

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Build the env filter for the given crate targets
///
/// `level` applies to every target in `targets`; other crates stay at `warn`.
pub fn build_filter(level: &str, targets: &[&str]) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let directives = std::iter::once("warn".to_string())
        .chain(targets.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(level: &str, format: LogFormat, targets: &[&str]) -> Result<()> {
    let filter = build_filter(level, targets);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_uses_level_for_targets() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let filter = build_filter("debug", &["secret_sync", "bump_version"]);
        let rendered = filter.to_string();
        assert!(rendered.contains("secret_sync=debug"));
        assert!(rendered.contains("bump_version=debug"));
        assert!(rendered.contains("warn"));
    }
}
