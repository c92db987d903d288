//! # Bump Version
//!
//! Sets a new release version in `VERSION` and rewrites the old version
//! string in the pipeline and view files.
//!
//! ```bash
//! bump-version 1.5.0
//! bump-version --file Pipeline/cloudbuild.yaml --file Application/views/index.ejs
//! bump-version            # prompts for the version
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use secret_sync::constants::{DEFAULT_VERSIONED_FILES, LOG_LEVEL_VAR};
use secret_sync::observability::logging::{self, LogFormat};
use secret_sync::version;
use std::path::PathBuf;

/// Bump the release version across the repository
#[derive(Parser, Debug)]
#[command(name = "bump-version", version, about, long_about = None)]
struct Cli {
    /// New version (prompted for when omitted)
    new_version: Option<String>,

    /// File to rewrite, relative to --root (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Repository root holding the VERSION file
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = LOG_LEVEL_VAR, default_value = "info")]
    log_level: String,
}

fn prompt_for_version() -> Result<String> {
    inquire::Text::new("Enter the Version you want:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                return Ok(inquire::validator::Validation::Invalid(
                    "Version cannot be empty".into(),
                ));
            }
            Ok(inquire::validator::Validation::Valid)
        })
        .prompt()
        .context("Failed to read the new version")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(
        &cli.log_level,
        LogFormat::Text,
        &["bump_version", "secret_sync"],
    )?;

    let new_version = match cli.new_version {
        Some(version) => version,
        None => prompt_for_version()?,
    };

    let files = if cli.files.is_empty() {
        DEFAULT_VERSIONED_FILES.iter().map(PathBuf::from).collect()
    } else {
        cli.files
    };

    let bump = version::update_version_in_files(&cli.root, &new_version, &files)?;
    if bump.is_noop() {
        println!("Version is already {}", bump.old_version);
    } else {
        println!(
            "Version {} updated to {} in {} file(s)",
            bump.old_version,
            bump.new_version,
            bump.files.len()
        );
    }
    Ok(())
}
