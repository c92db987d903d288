//! # Request Types
//!
//! GCP Secret Manager REST API request structures.
//!
//! These structs represent the JSON payloads sent to the GCP Secret Manager
//! REST API v1, as documented at:
//! https://cloud.google.com/secret-manager/docs/reference/rest

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

use super::responses::{AutomaticReplication, Replication, SecretPayload};

/// Request body for creating a new secret
///
/// Used in `POST /v1/projects/{project}/secrets?secretId={id}`. The secret id
/// travels as a query parameter; the body is the `Secret` resource.
/// This creates the secret metadata only. Values are added with
/// `AddVersionRequest`.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets/create
#[derive(Debug, Serialize)]
pub struct CreateSecretRequest {
    /// Replication configuration for the secret
    pub replication: Replication,
}

impl CreateSecretRequest {
    /// Request with automatic replication
    pub fn automatic() -> Self {
        Self {
            replication: Replication {
                automatic: Some(AutomaticReplication {}),
            },
        }
    }
}

/// Request body for adding a new version to an existing secret
///
/// Used in `POST /v1/projects/{project}/secrets/{secret}:addVersion`.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets/addVersion
#[derive(Debug, Serialize)]
pub struct AddVersionRequest {
    /// The secret payload containing the base64-encoded secret value
    pub payload: SecretPayload,
}

impl AddVersionRequest {
    /// Encode raw payload bytes into a request
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: SecretPayload::new(general_purpose::STANDARD.encode(payload)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_secret_request_body() {
        let body = serde_json::to_value(CreateSecretRequest::automatic()).unwrap();
        assert_eq!(body, json!({ "replication": { "automatic": {} } }));
    }

    #[test]
    fn test_add_version_request_encodes_base64() {
        let body = serde_json::to_value(AddVersionRequest::new(b"test-secret-value")).unwrap();
        assert_eq!(
            body,
            json!({ "payload": { "data": "dGVzdC1zZWNyZXQtdmFsdWU=" } })
        );
    }

    #[test]
    fn test_add_version_request_debug_is_redacted() {
        let request = AddVersionRequest::new(b"hunter2");
        assert!(!format!("{request:?}").contains("aHVudGVyMg=="));
    }
}
