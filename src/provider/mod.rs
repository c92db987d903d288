//! # Provider Modules
//!
//! The secret-store seam used by the syncer, and its Google Cloud
//! Secret Manager implementation.

use async_trait::async_trait;
use thiserror::Error;

pub mod gcp;

/// Classification of a store failure
///
/// Mirrors the canonical Google API status codes the sync cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The record already exists (create only)
    AlreadyExists,
    NotFound,
    PermissionDenied,
    Unauthenticated,
    InvalidArgument,
    /// Network errors, timeouts, 5xx
    Unavailable,
    Other,
}

impl StoreErrorKind {
    /// Map a canonical status string (e.g. `ALREADY_EXISTS`) to a kind
    pub fn from_status(status: &str) -> Self {
        match status {
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "NOT_FOUND" => Self::NotFound,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => Self::InvalidArgument,
            "UNAVAILABLE" | "DEADLINE_EXCEEDED" | "INTERNAL" | "RESOURCE_EXHAUSTED" => {
                Self::Unavailable
            }
            _ => Self::Other,
        }
    }

    /// Map an HTTP status code to a kind when no canonical status is available
    pub fn from_http_status(code: u16) -> Self {
        match code {
            409 => Self::AlreadyExists,
            404 => Self::NotFound,
            403 => Self::PermissionDenied,
            401 => Self::Unauthenticated,
            400 => Self::InvalidArgument,
            429 | 500..=599 => Self::Unavailable,
            _ => Self::Other,
        }
    }
}

/// Error returned by a [`SecretStore`] call
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the failed create means the record is already there
    ///
    /// The structured kind is authoritative. The "already exists" text match
    /// only covers stores that report duplicates without a status code.
    pub fn is_already_exists(&self) -> bool {
        self.kind == StoreErrorKind::AlreadyExists
            || (self.kind == StoreErrorKind::Other
                && self.message.to_ascii_lowercase().contains("already exists"))
    }
}

/// Remote secret store
///
/// Both calls take the project explicitly; implementations hold no
/// per-project state.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Create an empty secret record with automatic replication
    ///
    /// A duplicate must fail with [`StoreErrorKind::AlreadyExists`].
    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<(), StoreError>;

    /// Append a version holding `payload` to an existing record
    ///
    /// Returns the resource name of the new version.
    async fn add_secret_version(
        &self,
        project_id: &str,
        secret_id: &str,
        payload: &[u8],
    ) -> Result<String, StoreError>;
}
