//! # Path Builder
//!
//! Builds Secret Manager REST paths (relative to `/v1/`) from typed parts.
//!
//! ```rust
//! use secret_sync::provider::gcp::client::paths::{GcpOperation, PathBuilder};
//!
//! let path = PathBuilder::new()
//!     .gcp_operation(GcpOperation::AddVersion)
//!     .project("my-project")
//!     .secret("GCP_KEYFILE")
//!     .build_http_path()
//!     .unwrap();
//! assert_eq!(path, "projects/my-project/secrets/GCP_KEYFILE:addVersion");
//! ```

use thiserror::Error;

/// Secret Manager operations used by the sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcpOperation {
    /// `POST projects/{project}/secrets`
    CreateSecret,
    /// `POST projects/{project}/secrets/{secret}:addVersion`
    AddVersion,
}

/// Errors that can occur during path construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathBuilderError {
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(&'static str),
}

/// Builder for Secret Manager API paths
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    operation: Option<GcpOperation>,
    project: Option<String>,
    secret: Option<String>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gcp_operation(mut self, operation: GcpOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Path relative to the API version prefix, e.g. `projects/p/secrets`
    ///
    /// # Errors
    /// Returns an error if a parameter the operation needs was not set
    pub fn build_http_path(&self) -> Result<String, PathBuilderError> {
        let operation = self
            .operation
            .ok_or(PathBuilderError::MissingRequiredParameter("operation"))?;
        let project = self
            .project
            .as_deref()
            .ok_or(PathBuilderError::MissingRequiredParameter("project"))?;

        match operation {
            GcpOperation::CreateSecret => Ok(format!("projects/{project}/secrets")),
            GcpOperation::AddVersion => {
                let secret = self
                    .secret
                    .as_deref()
                    .ok_or(PathBuilderError::MissingRequiredParameter("secret"))?;
                Ok(format!("projects/{project}/secrets/{secret}:addVersion"))
            }
        }
    }
}
