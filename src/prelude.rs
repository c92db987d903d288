//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ```rust
//! use secret_sync::prelude::*;
//! ```

pub use crate::config::{ConfigSource, SyncOptions, SyncSettings};
pub use crate::error::SyncError;
pub use crate::provider::gcp::SecretManagerREST;
pub use crate::provider::{SecretStore, StoreError, StoreErrorKind};
pub use crate::sync::{
    run_sync, CreateOutcome, FailureStage, SecretOutcome, SecretResult, SecretSyncer, SyncReport,
};
pub use crate::version::{VersionBump, VersionError};
