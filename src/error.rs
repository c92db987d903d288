//! # Errors
//!
//! Run-level errors for the sync. Per-secret failures are not errors at this
//! level; they are recorded in the [`crate::sync::SyncReport`] and the run
//! carries on.

use crate::constants::{CREDENTIALS_VAR, PROJECT_ID_VAR};
use thiserror::Error;

/// Errors that stop the whole run
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(
        "{CREDENTIALS_VAR} environment variable not set. Please set it to the path of your service account key JSON file."
    )]
    MissingCredentials,
    #[error("{PROJECT_ID_VAR} not found in the .env file or environment.")]
    MissingProjectId,
    #[error("Failed to load configuration")]
    Config(#[source] anyhow::Error),
    #[error("Failed to initialize Secret Manager client")]
    Client(#[source] anyhow::Error),
}

impl SyncError {
    /// Whether this is a missing-input precondition rather than a runtime failure
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::MissingCredentials | SyncError::MissingProjectId)
    }
}
