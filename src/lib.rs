//! GCP Secret Sync Library
//!
//! Pushes allow-listed values from the merged process environment and a
//! `.env` overlay, plus a service key file, into Google Cloud Secret Manager.
//! Also hosts the release version-bump helper used by `bump-version`.
//!
//! ## Quick Start
//!
//! ```rust
//! use secret_sync::prelude::*;
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod prelude;
pub mod provider;
pub mod sync;
pub mod version;
