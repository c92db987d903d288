//! # Store Operations
//!
//! Implementation of [`SecretStore`] for the GCP Secret Manager REST API.

use crate::provider::gcp::client::common::OperationTracker;
use crate::provider::gcp::client::paths::{GcpOperation, PathBuilder};
use crate::provider::gcp::client::rest::SecretManagerREST;
use crate::provider::{SecretStore, StoreError, StoreErrorKind};
use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, field, info_span, warn, Instrument};

use super::requests::{AddVersionRequest, CreateSecretRequest};
use super::responses::{Secret, SecretVersion};

fn path_error(error: &impl std::fmt::Display) -> StoreError {
    StoreError::new(
        StoreErrorKind::InvalidArgument,
        format!("Failed to build request path: {error}"),
    )
}

/// Name of the version created by a successful `addVersion`
///
/// Falls back to `projects/{project}/secrets/{secret}/versions/unknown` when
/// the reply does not decode.
fn version_name_from_body(body: &str, project_id: &str, secret_id: &str) -> String {
    match serde_json::from_str::<SecretVersion>(body) {
        Ok(version) => {
            debug!(
                "Added version {} (state: {})",
                version.name,
                version.state.as_deref().unwrap_or("UNKNOWN")
            );
            version.name
        }
        Err(e) => {
            warn!(
                "Added a version to secret {} but could not parse the response: {}",
                secret_id, e
            );
            format!("projects/{project_id}/secrets/{secret_id}/versions/unknown")
        }
    }
}

#[async_trait]
impl SecretStore for SecretManagerREST {
    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<(), StoreError> {
        let span = info_span!(
            "gcp.secret.create",
            secret.name = secret_id,
            project.id = project_id,
            operation.success = field::Empty,
            operation.duration_ms = field::Empty,
            error.message = field::Empty,
        );
        let tracker = OperationTracker::new(span.clone(), "create_secret");

        async move {
            let path = PathBuilder::new()
                .gcp_operation(GcpOperation::CreateSecret)
                .project(project_id)
                .build_http_path()
                .map_err(|e| path_error(&e))?;

            let response = self
                .make_request(Method::POST, &path)
                .query(&[("secretId", secret_id)])
                .json(&CreateSecretRequest::automatic())
                .send()
                .await
                .map_err(|e| {
                    let err = Self::transport_error("Failed to create secret", &e);
                    tracker.record_error(err.message());
                    err
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                let err = Self::handle_error_response(status, &error_text);
                tracker.record_error(err.message());
                return Err(err);
            }

            tracker.record_success();
            match response.json::<Secret>().await {
                Ok(secret) => debug!("Created secret resource {}", secret.name),
                Err(e) => debug!("Created secret {} (response not parsed: {})", secret_id, e),
            }
            Ok(())
        }
        .instrument(span)
        .await
    }

    async fn add_secret_version(
        &self,
        project_id: &str,
        secret_id: &str,
        payload: &[u8],
    ) -> Result<String, StoreError> {
        let span = info_span!(
            "gcp.secret.add_version",
            secret.name = secret_id,
            project.id = project_id,
            payload.bytes = payload.len(),
            operation.success = field::Empty,
            operation.duration_ms = field::Empty,
            error.message = field::Empty,
        );
        let tracker = OperationTracker::new(span.clone(), "add_secret_version");

        async move {
            let path = PathBuilder::new()
                .gcp_operation(GcpOperation::AddVersion)
                .project(project_id)
                .secret(secret_id)
                .build_http_path()
                .map_err(|e| path_error(&e))?;

            // GCP Secret Manager expects base64-encoded data
            let request = AddVersionRequest::new(payload);

            let response = self
                .make_request(Method::POST, &path)
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    let err = Self::transport_error("Failed to add secret version", &e);
                    tracker.record_error(err.message());
                    err
                })?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                let err = Self::handle_error_response(status, &error_text);
                tracker.record_error(err.message());
                return Err(err);
            }

            // The version is stored once the call succeeds; an unreadable
            // reply only loses its name
            tracker.record_success();
            let body = response.text().await.unwrap_or_default();
            Ok(version_name_from_body(&body, project_id, secret_id))
        }
        .instrument(span)
        .await
    }
}
