//! # Secret Sync
//!
//! Pushes local configuration into Google Cloud Secret Manager.
//!
//! ## Overview
//!
//! 1. **Load configuration** - Process environment merged with the `.env` overlay
//! 2. **Check preconditions** - `GOOGLE_APPLICATION_CREDENTIALS` and `PROJECT_ID` must be set
//! 3. **Sync the key file** - Stored as `GCP_KEYFILE` when present
//! 4. **Sync allow-listed entries** - Exact names plus the `GCP_` / `SECRET_` prefixes
//!
//! Each secret gets one status line on stdout. Logs go to stderr.
//!
//! ## Exit status
//!
//! - `0` every secret synced
//! - `1` at least one secret failed
//! - `2` a precondition failed or the client could not be created

use anyhow::Result;
use clap::Parser;
use secret_sync::config::{ConfigSource, SyncOptions};
use secret_sync::constants::{
    DEFAULT_ENV_FILE, DEFAULT_KEYFILE_PATH, DEFAULT_KEYFILE_SECRET_ID,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SECRET_MANAGER_ENDPOINT, ENDPOINT_VAR, ENV_FILE_VAR,
    KEYFILE_VAR, LOG_FORMAT_VAR, LOG_LEVEL_VAR, METRICS_FILE_VAR,
};
use secret_sync::error::SyncError;
use secret_sync::observability::logging::{self, LogFormat};
use secret_sync::observability::metrics;
use secret_sync::provider::gcp::SecretManagerREST;
use secret_sync::sync::{self, SyncReport};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

const EXIT_SECRET_FAILURES: u8 = 1;
const EXIT_FATAL: u8 = 2;

/// Sync .env values and the service key file into GCP Secret Manager
#[derive(Parser, Debug)]
#[command(name = "secret-sync", version, about, long_about = None)]
struct Cli {
    /// Overlay file merged under the process environment
    #[arg(long, env = ENV_FILE_VAR, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Key file synced as a single secret when present
    #[arg(long, env = KEYFILE_VAR, default_value = DEFAULT_KEYFILE_PATH)]
    keyfile: PathBuf,

    /// Secret id the key file is stored under
    #[arg(long, default_value = DEFAULT_KEYFILE_SECRET_ID)]
    keyfile_secret_id: String,

    /// Secret Manager endpoint
    #[arg(long, env = ENDPOINT_VAR, default_value = DEFAULT_SECRET_MANAGER_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    /// Print the secret ids that would be synced and exit
    #[arg(long)]
    dry_run: bool,

    /// Write Prometheus metrics to this file at the end of the run
    #[arg(long, env = METRICS_FILE_VAR)]
    metrics_file: Option<PathBuf>,

    /// Log level for this tool (overridden by RUST_LOG)
    #[arg(long, env = LOG_LEVEL_VAR, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = LOG_FORMAT_VAR, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            keyfile_path: self.keyfile.clone(),
            keyfile_secret_id: self.keyfile_secret_id.clone(),
            endpoint: self.endpoint.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        return ExitCode::from(EXIT_FATAL);
    }

    if let Err(e) = logging::init_tracing(&cli.log_level, cli.log_format, &["secret_sync"]) {
        eprintln!("{e:#}");
        return ExitCode::from(EXIT_FATAL);
    }

    info!(
        "secret-sync {} (git {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env!("BUILD_DATETIME")
    );

    if let Err(e) = metrics::register_metrics() {
        warn!("Metrics unavailable: {:#}", e);
    }

    let code = match run(&cli).await {
        Ok(report) if report.has_failures() => ExitCode::from(EXIT_SECRET_FAILURES),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let precondition = e
                .downcast_ref::<SyncError>()
                .is_some_and(SyncError::is_precondition);
            if precondition {
                eprintln!("❌ {e}");
            } else {
                error!("{:#}", e);
                eprintln!("❌ {e:#}");
            }
            ExitCode::from(EXIT_FATAL)
        }
    };

    if let Some(path) = &cli.metrics_file {
        match metrics::write_textfile(path) {
            Ok(()) => info!("Wrote metrics to {}", path.display()),
            Err(e) => warn!("{:#}", e),
        }
    }

    code
}

async fn run(cli: &Cli) -> Result<SyncReport> {
    let config = ConfigSource::load(&cli.env_file).map_err(SyncError::Config)?;

    if cli.dry_run {
        let planned = sync::plan_sync(&config, cli.sync_options()).await?;
        println!("Dry run: {} secret(s) would be synced", planned.len());
        for secret_id in planned {
            println!("  {secret_id}");
        }
        return Ok(SyncReport::default());
    }

    let report = sync::run_sync(&config, cli.sync_options(), |settings| async move {
        SecretManagerREST::new(&settings).await
    })
    .await?;

    for result in report.results() {
        println!("{result}");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use secret_sync::sync::selection::is_synced;

    #[test]
    fn test_cli_env_names_are_not_synced() {
        let command = Cli::command();
        let env_names: Vec<String> = command
            .get_arguments()
            .filter_map(|arg| arg.get_env())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        assert!(env_names.iter().any(|name| name == ENV_FILE_VAR));
        for name in &env_names {
            assert!(!is_synced(name), "{name} would be uploaded as a secret");
        }
    }
}
