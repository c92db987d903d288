//! GCP Secret Manager REST Client
//!
//! Native REST implementation for GCP Secret Manager API v1.
//! Uses reqwest for HTTP requests and an OAuth2 bearer token for authentication.
//!
//! This implementation:
//! - Works directly with Pact HTTP mock servers
//! - Uses reqwest with rustls (no OpenSSL dependencies)
//! - Reports failures with the canonical API status so callers can branch on it
//!
//! References:
//! - [GCP Secret Manager REST API v1](https://cloud.google.com/secret-manager/docs/reference/rest)

mod operations;
mod requests;
mod responses;

pub use requests::*;
pub use responses::*;

use crate::config::SyncSettings;
use crate::provider::gcp::client::auth;
use crate::provider::{StoreError, StoreErrorKind};
use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use tracing::info;
use zeroize::Zeroizing;

/// GCP Secret Manager REST client
pub struct SecretManagerREST {
    http_client: Client,
    base_url: String,
    access_token: Zeroizing<String>,
}

impl std::fmt::Debug for SecretManagerREST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerREST")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SecretManagerREST {
    /// Create a client for the endpoint in `settings` and obtain an access token
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or no token source succeeds
    pub async fn new(settings: &SyncSettings) -> Result<Self> {
        info!(
            "Initializing GCP REST client for project {} at {}",
            settings.project_id, settings.endpoint
        );

        // Create HTTP client with rustls (configured in Cargo.toml)
        let http_client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let access_token = auth::resolve_access_token(settings, &http_client).await?;

        Ok(Self {
            http_client,
            base_url: settings.endpoint.clone(),
            access_token,
        })
    }

    /// Create a client with an already-obtained token
    pub fn with_access_token(
        http_client: Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: Zeroizing::new(access_token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build HTTP request with authentication headers
    pub(crate) fn make_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/v1/{}", self.base_url, path);

        // Tokens from the metadata server or gcloud never carry the prefix, but
        // GOOGLE_OAUTH_ACCESS_TOKEN sometimes does
        let token = self
            .access_token
            .strip_prefix("Bearer ")
            .unwrap_or(self.access_token.as_str());

        self.http_client
            .request(method, url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
    }

    /// Turn a non-success response into a classified [`StoreError`]
    pub(crate) fn handle_error_response(status: StatusCode, error_text: &str) -> StoreError {
        if let Ok(error_response) = serde_json::from_str::<GcpErrorResponse>(error_text) {
            let error = error_response.error;
            let kind = error
                .status
                .as_deref()
                .map_or_else(
                    || StoreErrorKind::from_http_status(error.code),
                    StoreErrorKind::from_status,
                );
            StoreError::new(
                kind,
                format!(
                    "GCP API error: {} (code: {}, status: {})",
                    error.message,
                    error.code,
                    error.status.as_deref().unwrap_or("UNKNOWN")
                ),
            )
        } else {
            // Include status code in error message for easier matching in tests
            StoreError::new(
                StoreErrorKind::from_http_status(status.as_u16()),
                format!("HTTP {} (status: {}): {}", status.as_u16(), status, error_text),
            )
        }
    }

    /// Classify a transport-level failure (connect, timeout, TLS)
    pub(crate) fn transport_error(context: &str, error: &reqwest::Error) -> StoreError {
        StoreError::new(StoreErrorKind::Unavailable, format!("{context}: {error}"))
    }
}
