//! # Response Types
//!
//! GCP Secret Manager REST API response structures, plus the shared
//! `Replication` and `SecretPayload` shapes used in requests.
//!
//! API schema: https://cloud.google.com/secret-manager/docs/reference/rest

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Secret resource returned by `create`
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets#Secret
#[derive(Debug, Deserialize)]
pub struct Secret {
    /// The resource name of the secret in the format `projects/*/secrets/*`
    pub name: String,
}

/// Replication configuration for a secret
///
/// Only automatic replication is used.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets#Replication
#[derive(Debug, Serialize, Deserialize)]
pub struct Replication {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automatic: Option<AutomaticReplication>,
}

/// Automatic replication: the secret is replicated without location restrictions
///
/// Serializes as `{}`; a unit struct would serialize as `null`.
#[allow(
    clippy::empty_structs_with_brackets,
    reason = "Must serialize as an empty JSON object"
)]
#[derive(Debug, Serialize, Deserialize)]
pub struct AutomaticReplication {}

/// Secret payload
///
/// `data` is the base64 encoding of the secret bytes.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/SecretPayload
#[derive(Serialize)]
pub struct SecretPayload {
    data: Zeroizing<String>,
}

impl SecretPayload {
    pub fn new(data: String) -> Self {
        Self {
            data: Zeroizing::new(data),
        }
    }
}

impl std::fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretPayload")
            .field("data", &format_args!("<{} base64 chars>", self.data.len()))
            .finish()
    }
}

/// Secret version returned by `addVersion`
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets.versions#SecretVersion
#[derive(Debug, Deserialize)]
pub struct SecretVersion {
    /// `projects/*/secrets/*/versions/*`
    pub name: String,
    /// `ENABLED`, `DISABLED` or `DESTROYED`
    #[serde(default)]
    pub state: Option<String>,
}

/// GCP API error response wrapper
///
/// API Reference: https://cloud.google.com/apis/design/errors
#[derive(Debug, Deserialize)]
pub struct GcpErrorResponse {
    pub error: GcpError,
}

/// Detailed error information from GCP API
#[derive(Debug, Deserialize)]
pub struct GcpError {
    /// HTTP status code (e.g., 404, 403, 409)
    pub code: u16,
    /// Human-readable error message
    pub message: String,
    /// Canonical status (e.g., "ALREADY_EXISTS", "PERMISSION_DENIED")
    #[serde(default)]
    pub status: Option<String>,
}

/// OAuth2 access token response from the GCP metadata server
///
/// Endpoint: `http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token`
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: Zeroizing<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}
