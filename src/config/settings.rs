//! # Sync Settings
//!
//! Explicit run configuration, built once at startup from a [`ConfigSource`]
//! and command-line options, then passed by reference. Nothing downstream
//! reads the process environment.

use crate::config::ConfigSource;
use crate::constants::{
    ACCESS_TOKEN_VAR, CREDENTIALS_VAR, DEFAULT_KEYFILE_PATH, DEFAULT_KEYFILE_SECRET_ID,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SECRET_MANAGER_ENDPOINT, PROJECT_ID_VAR,
};
use crate::error::SyncError;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

/// Command-line level options that are not part of the loaded configuration
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Key file synced as a single secret when present
    pub keyfile_path: PathBuf,
    /// Secret id the key file is stored under
    pub keyfile_secret_id: String,
    /// Secret Manager base URL
    pub endpoint: String,
    /// Per-request timeout for Secret Manager calls
    pub request_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            keyfile_path: PathBuf::from(DEFAULT_KEYFILE_PATH),
            keyfile_secret_id: DEFAULT_KEYFILE_SECRET_ID.to_string(),
            endpoint: DEFAULT_SECRET_MANAGER_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Validated settings for one sync run
#[derive(Clone)]
pub struct SyncSettings {
    /// Target GCP project
    pub project_id: String,
    /// Service account key path (used by Application Default Credentials)
    pub credentials_path: PathBuf,
    /// Pre-minted OAuth2 access token, if one was provided
    pub access_token: Option<Zeroizing<String>>,
    /// Route calls to a mock server with a dummy token
    pub pact_mode: bool,
    pub keyfile_path: PathBuf,
    pub keyfile_secret_id: String,
    pub endpoint: String,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSettings")
            .field("project_id", &self.project_id)
            .field("credentials_path", &self.credentials_path)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("pact_mode", &self.pact_mode)
            .field("keyfile_path", &self.keyfile_path)
            .field("keyfile_secret_id", &self.keyfile_secret_id)
            .field("endpoint", &self.endpoint)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl SyncSettings {
    /// Check the run preconditions and build the settings
    ///
    /// The credentials variable is checked first, then the project id.
    ///
    /// # Errors
    /// - [`SyncError::MissingCredentials`] if the credentials variable is absent
    /// - [`SyncError::MissingProjectId`] if the project id is absent or blank
    pub fn from_config(config: &ConfigSource, options: SyncOptions) -> Result<Self, SyncError> {
        let credentials_path = config
            .get(CREDENTIALS_VAR)
            .map(PathBuf::from)
            .ok_or(SyncError::MissingCredentials)?;

        let project_id = config
            .get_non_empty(PROJECT_ID_VAR)
            .map(|value| value.trim().to_string())
            .ok_or(SyncError::MissingProjectId)?;

        let access_token = config
            .get_non_empty(ACCESS_TOKEN_VAR)
            .map(|token| Zeroizing::new(token.trim().to_string()));

        Ok(Self {
            project_id,
            credentials_path,
            access_token,
            pact_mode: config.contains("PACT_MODE"),
            keyfile_path: options.keyfile_path,
            keyfile_secret_id: options.keyfile_secret_id,
            endpoint: options.endpoint.trim_end_matches('/').to_string(),
            request_timeout: options.request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(items: &[(&str, &str)]) -> ConfigSource {
        ConfigSource::from_layers(
            items
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
            Vec::new(),
        )
    }

    #[test]
    fn test_missing_credentials_is_checked_first() {
        let err = SyncSettings::from_config(&config(&[]), SyncOptions::default()).unwrap_err();
        assert!(matches!(err, SyncError::MissingCredentials));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_missing_project_id() {
        let err = SyncSettings::from_config(
            &config(&[(CREDENTIALS_VAR, "/keys/sa.json")]),
            SyncOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::MissingProjectId));
    }

    #[test]
    fn test_blank_project_id_is_missing() {
        let err = SyncSettings::from_config(
            &config(&[(CREDENTIALS_VAR, "/keys/sa.json"), (PROJECT_ID_VAR, "")]),
            SyncOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::MissingProjectId));
    }

    #[test]
    fn test_settings_from_config() {
        let options = SyncOptions {
            endpoint: "http://localhost:8080/".to_string(),
            ..SyncOptions::default()
        };
        let settings = SyncSettings::from_config(
            &config(&[
                (CREDENTIALS_VAR, "/keys/sa.json"),
                (PROJECT_ID_VAR, "my-project"),
                (ACCESS_TOKEN_VAR, "ya29.token"),
            ]),
            options,
        )
        .unwrap();

        assert_eq!(settings.project_id, "my-project");
        assert_eq!(settings.credentials_path, PathBuf::from("/keys/sa.json"));
        assert_eq!(settings.endpoint, "http://localhost:8080");
        assert_eq!(settings.keyfile_secret_id, DEFAULT_KEYFILE_SECRET_ID);
        assert!(!settings.pact_mode);
        assert!(!format!("{settings:?}").contains("ya29.token"));
    }
}
