//! # Access Tokens
//!
//! OAuth2 access token acquisition for the REST client.
//!
//! Sources, tried in order:
//! 1. Pact mode - dummy token for contract tests
//! 2. `GOOGLE_OAUTH_ACCESS_TOKEN` - a pre-minted token
//! 3. Metadata server - Workload Identity on GKE/GCE
//! 4. `gcloud auth application-default print-access-token` - Application
//!    Default Credentials, pointed at the configured service account key

use crate::config::SyncSettings;
use crate::constants::{CREDENTIALS_VAR, METADATA_TIMEOUT_SECS, METADATA_TOKEN_URL};
use crate::provider::gcp::client::rest::TokenResponse;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Where the access token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Pact,
    Environment,
    MetadataServer,
    Gcloud,
}

/// Obtain an access token for Secret Manager calls
///
/// # Errors
/// Returns an error listing the attempted sources if none produced a token
pub async fn resolve_access_token(
    settings: &SyncSettings,
    http_client: &Client,
) -> Result<Zeroizing<String>> {
    if let Some((token, source)) = static_token(settings) {
        info!("Using access token from {:?}", source);
        return Ok(token);
    }

    match metadata_server_token(http_client).await {
        Ok(token) => {
            info!("Retrieved access token from metadata server (Workload Identity)");
            return Ok(token);
        }
        Err(e) => debug!("Metadata server not available: {:#}", e),
    }

    match gcloud_token(settings).await {
        Ok(token) => {
            info!(
                "Retrieved access token from gcloud Application Default Credentials ({})",
                settings.credentials_path.display()
            );
            return Ok(token);
        }
        Err(e) => debug!("gcloud token lookup failed: {:#}", e),
    }

    Err(anyhow!(
        "Failed to get access token. Ensure one of:\n\
        1. GOOGLE_OAUTH_ACCESS_TOKEN is set, OR\n\
        2. Running in GKE/GCE with Workload Identity enabled, OR\n\
        3. The gcloud CLI is installed and {CREDENTIALS_VAR} points to a valid service account key"
    ))
}

/// Tokens that need no network call
pub fn static_token(settings: &SyncSettings) -> Option<(Zeroizing<String>, TokenSource)> {
    if settings.pact_mode {
        return Some((Zeroizing::new("test-token".to_string()), TokenSource::Pact));
    }
    settings
        .access_token
        .clone()
        .map(|token| (token, TokenSource::Environment))
}

async fn metadata_server_token(http_client: &Client) -> Result<Zeroizing<String>> {
    let response = http_client
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .timeout(Duration::from_secs(METADATA_TIMEOUT_SECS))
        .send()
        .await
        .context("Metadata server request failed")?;

    if !response.status().is_success() {
        return Err(anyhow!("Metadata server returned status {}", response.status()));
    }

    let token_response: TokenResponse = response
        .json()
        .await
        .context("Failed to parse token response from metadata server")?;
    Ok(token_response.access_token)
}

async fn gcloud_token(settings: &SyncSettings) -> Result<Zeroizing<String>> {
    let gcloud = which::which("gcloud").context("gcloud CLI not found in PATH")?;

    let output = tokio::process::Command::new(&gcloud)
        .args(["auth", "application-default", "print-access-token"])
        .env(CREDENTIALS_VAR, &settings.credentials_path)
        .output()
        .await
        .with_context(|| format!("Failed to run {}", gcloud.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "gcloud exited with {}: {}",
            output.status,
            stderr.trim()
        ));
    }

    let token = Zeroizing::new(
        String::from_utf8(output.stdout)
            .context("gcloud printed a non-UTF-8 token")?
            .trim()
            .to_string(),
    );
    if token.is_empty() {
        return Err(anyhow!("gcloud printed an empty access token"));
    }
    Ok(token)
}
