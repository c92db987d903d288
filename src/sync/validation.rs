//! # Secret Validation
//!
//! Local checks run before any Secret Manager call.

use crate::constants::{MAX_SECRET_ID_LEN, MAX_SECRET_PAYLOAD_BYTES};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static SECRET_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("secret id regex is valid - this should never happen")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("secret id cannot be empty")]
    EmptySecretId,
    #[error("secret id '{id}' exceeds maximum length of {MAX_SECRET_ID_LEN} characters (got {len})")]
    SecretIdTooLong { id: String, len: usize },
    #[error(
        "secret id '{0}' must contain only alphanumeric characters, hyphens, and underscores"
    )]
    InvalidSecretId(String),
    #[error("secret payload is {0} bytes; Secret Manager accepts at most {MAX_SECRET_PAYLOAD_BYTES}")]
    PayloadTooLarge(usize),
}

/// Validate a Secret Manager secret id
///
/// Format: alphanumeric, hyphens, underscores. Length: 1-255 characters.
pub fn validate_secret_id(secret_id: &str) -> Result<(), ValidationError> {
    if secret_id.is_empty() {
        return Err(ValidationError::EmptySecretId);
    }

    if secret_id.len() > MAX_SECRET_ID_LEN {
        return Err(ValidationError::SecretIdTooLong {
            id: secret_id.to_string(),
            len: secret_id.len(),
        });
    }

    if !SECRET_ID_REGEX.is_match(secret_id) {
        return Err(ValidationError::InvalidSecretId(secret_id.to_string()));
    }

    Ok(())
}

/// Validate the encoded payload size
pub fn validate_payload(payload: &[u8]) -> Result<(), ValidationError> {
    if payload.len() > MAX_SECRET_PAYLOAD_BYTES {
        return Err(ValidationError::PayloadTooLarge(payload.len()));
    }
    Ok(())
}
