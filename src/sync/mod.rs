//! # Secret Sync
//!
//! Pushes selected configuration values into a [`SecretStore`].
//!
//! ## Flow
//!
//! 1. Check the run preconditions and build [`SyncSettings`]
//! 2. Connect to the store
//! 3. Sync the key file, if present, under its fixed secret id
//! 4. Sync every allow-listed entry in load order
//!
//! Each secret is synced with create-then-add-version. A duplicate create is
//! not an error: the record is reused and a new version is added. Any other
//! failure skips that secret and the run carries on.

pub mod keyfile;
pub mod report;
pub mod selection;
pub mod validation;

pub use report::{CreateOutcome, FailureStage, SecretOutcome, SecretResult, SyncReport};

use crate::config::{ConfigSource, SyncOptions, SyncSettings};
use crate::error::SyncError;
use crate::observability::metrics;
use crate::provider::{SecretStore, StoreError};
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Syncs secrets into one store
pub struct SecretSyncer<'a> {
    store: &'a dyn SecretStore,
}

impl std::fmt::Debug for SecretSyncer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSyncer").finish_non_exhaustive()
    }
}

impl<'a> SecretSyncer<'a> {
    pub fn new(store: &'a dyn SecretStore) -> Self {
        Self { store }
    }

    /// Create the record, treating a duplicate as success
    ///
    /// # Errors
    /// Returns the store error for any failure other than a duplicate
    pub async fn ensure_secret(
        &self,
        project_id: &str,
        secret_id: &str,
    ) -> Result<CreateOutcome, StoreError> {
        match self.store.create_secret(project_id, secret_id).await {
            Ok(()) => Ok(CreateOutcome::Created),
            Err(e) if e.is_already_exists() => {
                debug!("Secret {} already exists: {}", secret_id, e);
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// Make sure `secret_id` exists and append `value` as a new version
    ///
    /// Never fails the run: every failure is returned as
    /// [`SecretOutcome::Failed`] for this secret only.
    pub async fn ensure_secret_and_add_version(
        &self,
        project_id: &str,
        secret_id: &str,
        value: &str,
    ) -> SecretOutcome {
        let payload = value.as_bytes();
        if let Err(e) = validation::validate_secret_id(secret_id)
            .and_then(|()| validation::validate_payload(payload))
        {
            warn!("Skipping secret {}: {}", secret_id, e);
            return failed(FailureStage::Validation, e.to_string());
        }

        let create = match self.ensure_secret(project_id, secret_id).await {
            Ok(create) => create,
            Err(e) => {
                error!("Error creating secret {}: {}", secret_id, e);
                return failed(FailureStage::Create, e.to_string());
            }
        };

        let version = match self
            .store
            .add_secret_version(project_id, secret_id, payload)
            .await
        {
            Ok(version) => version,
            Err(e) => {
                error!("Error adding version to secret {}: {}", secret_id, e);
                return failed(FailureStage::AddVersion, e.to_string());
            }
        };

        match create {
            CreateOutcome::Created => {
                info!("Created secret {} with version {}", secret_id, version);
                metrics::increment_secrets_created();
            }
            CreateOutcome::AlreadyExists => {
                info!("Secret {} already exists, added version {}", secret_id, version);
                metrics::increment_secrets_existing();
            }
        }
        SecretOutcome::from_create(create, version)
    }

    /// Sync the key file under its secret id
    ///
    /// Returns `None` when the key file does not exist.
    pub async fn sync_keyfile(&self, settings: &SyncSettings) -> Option<SecretResult> {
        let secret_id = settings.keyfile_secret_id.as_str();
        let outcome = match keyfile::read_keyfile(&settings.keyfile_path).await {
            Ok(Some(contents)) => {
                self.ensure_secret_and_add_version(&settings.project_id, secret_id, &contents)
                    .await
            }
            Ok(None) => return None,
            Err(e) => {
                error!("Error reading key file for {}: {:#}", secret_id, e);
                failed(FailureStage::Read, format!("{e:#}"))
            }
        };
        Some(SecretResult::new(secret_id, outcome))
    }

    /// Sync the key file, then every selected entry of `config`
    pub async fn run(&self, settings: &SyncSettings, config: &ConfigSource) -> SyncReport {
        let mut report = SyncReport::default();

        if let Some(result) = self.sync_keyfile(settings).await {
            report.push(result);
        }

        for (name, value) in selection::select(config) {
            let outcome = self
                .ensure_secret_and_add_version(&settings.project_id, name, value)
                .await;
            report.push(SecretResult::new(name, outcome));
        }

        info!(
            "Sync finished: {} created, {} already existed, {} failed",
            report.created_count(),
            report.existing_count(),
            report.failed_count()
        );
        report
    }
}

fn failed(stage: FailureStage, message: String) -> SecretOutcome {
    metrics::increment_secret_failures();
    SecretOutcome::Failed { stage, message }
}

/// Check preconditions, connect, and sync
///
/// `connect` is only called once the preconditions hold, so a missing
/// credentials variable or project id never constructs a client.
///
/// # Errors
/// Returns [`SyncError`] for a failed precondition or a failed `connect`.
/// Per-secret failures are in the returned [`SyncReport`].
pub async fn run_sync<S, F, Fut>(
    config: &ConfigSource,
    options: SyncOptions,
    connect: F,
) -> Result<SyncReport, SyncError>
where
    S: SecretStore,
    F: FnOnce(SyncSettings) -> Fut,
    Fut: Future<Output = anyhow::Result<S>>,
{
    let settings = SyncSettings::from_config(config, options)?;
    info!("Syncing secrets for project {}", settings.project_id);

    let store = connect(settings.clone()).await.map_err(SyncError::Client)?;
    let syncer = SecretSyncer::new(&store);
    Ok(syncer.run(&settings, config).await)
}

/// Secret ids a run would sync, without touching the store
///
/// # Errors
/// Returns [`SyncError`] for a failed precondition
pub async fn plan_sync(config: &ConfigSource, options: SyncOptions) -> Result<Vec<String>, SyncError> {
    let settings = SyncSettings::from_config(config, options)?;

    let mut planned = Vec::new();
    let keyfile_present = tokio::fs::try_exists(&settings.keyfile_path)
        .await
        .unwrap_or(false);
    if keyfile_present {
        planned.push(settings.keyfile_secret_id.clone());
    }
    planned.extend(selection::select(config).map(|(name, _)| name.to_string()));
    Ok(planned)
}
