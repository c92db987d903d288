//! Common test utilities
//!
//! Provides rustls setup for the Pact tests and a recording in-memory
//! secret store for the sync tests.

#![allow(dead_code, reason = "Each test binary uses a different subset")]

use async_trait::async_trait;
use secret_sync::provider::{SecretStore, StoreError, StoreErrorKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, Once};

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// This must be called before any async operations that use rustls.
/// Uses a `Once` to ensure it's only called once across all tests.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // We use ring as the crypto provider (matches main application)
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

/// One call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Create { project_id: String, secret_id: String },
    AddVersion { project_id: String, secret_id: String, payload: String },
}

impl StoreCall {
    pub fn secret_id(&self) -> &str {
        match self {
            StoreCall::Create { secret_id, .. } | StoreCall::AddVersion { secret_id, .. } => {
                secret_id
            }
        }
    }
}

#[derive(Debug, Default)]
struct State {
    /// record id -> versions, oldest first
    records: BTreeMap<String, Vec<String>>,
    calls: Vec<StoreCall>,
    create_failures: HashMap<String, StoreError>,
    add_failures: HashMap<String, StoreError>,
}

/// Secret store backed by a map, recording every call
///
/// Clones share state, so a clone handed to the syncer can be inspected
/// from the test afterwards.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    state: Arc<Mutex<State>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with records that already exist
    pub fn with_existing(secret_ids: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            for id in secret_ids {
                state.records.insert((*id).to_string(), Vec::new());
            }
        }
        store
    }

    /// Make creates of `secret_id` fail with `kind`
    pub fn fail_create(&self, secret_id: &str, kind: StoreErrorKind, message: &str) {
        self.state
            .lock()
            .unwrap()
            .create_failures
            .insert(secret_id.to_string(), StoreError::new(kind, message));
    }

    /// Make add-version calls for `secret_id` fail with `kind`
    pub fn fail_add_version(&self, secret_id: &str, kind: StoreErrorKind, message: &str) {
        self.state
            .lock()
            .unwrap()
            .add_failures
            .insert(secret_id.to_string(), StoreError::new(kind, message));
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn record_ids(&self) -> Vec<String> {
        self.state.lock().unwrap().records.keys().cloned().collect()
    }

    pub fn versions(&self, secret_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(secret_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn create_count(&self, secret_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Create { .. }) && call.secret_id() == secret_id)
            .count()
    }

    pub fn add_version_count(&self, secret_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                matches!(call, StoreCall::AddVersion { .. }) && call.secret_id() == secret_id
            })
            .count()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn create_secret(&self, project_id: &str, secret_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StoreCall::Create {
            project_id: project_id.to_string(),
            secret_id: secret_id.to_string(),
        });

        if let Some(err) = state.create_failures.get(secret_id) {
            return Err(err.clone());
        }
        if state.records.contains_key(secret_id) {
            return Err(StoreError::new(
                StoreErrorKind::AlreadyExists,
                format!("Secret [projects/{project_id}/secrets/{secret_id}] already exists."),
            ));
        }
        state.records.insert(secret_id.to_string(), Vec::new());
        Ok(())
    }

    async fn add_secret_version(
        &self,
        project_id: &str,
        secret_id: &str,
        payload: &[u8],
    ) -> Result<String, StoreError> {
        let mut state = self.state.lock().unwrap();
        let payload = String::from_utf8_lossy(payload).into_owned();
        state.calls.push(StoreCall::AddVersion {
            project_id: project_id.to_string(),
            secret_id: secret_id.to_string(),
            payload: payload.clone(),
        });

        if let Some(err) = state.add_failures.get(secret_id) {
            return Err(err.clone());
        }
        let versions = state.records.get_mut(secret_id).ok_or_else(|| {
            StoreError::new(
                StoreErrorKind::NotFound,
                format!("Secret [projects/{project_id}/secrets/{secret_id}] not found."),
            )
        })?;
        versions.push(payload);
        Ok(format!(
            "projects/{project_id}/secrets/{secret_id}/versions/{}",
            versions.len()
        ))
    }
}
