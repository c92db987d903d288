//! End-to-end sync tests against a recording in-memory store

mod common;

use common::{InMemorySecretStore, StoreCall};
use secret_sync::config::{ConfigSource, SyncOptions};
use secret_sync::constants::{CREDENTIALS_VAR, PROJECT_ID_VAR};
use secret_sync::error::SyncError;
use secret_sync::provider::StoreErrorKind;
use secret_sync::sync::{self, FailureStage, SecretOutcome, SyncReport};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::TempDir;

const PROJECT: &str = "test-project";

fn config(entries: &[(&str, &str)]) -> ConfigSource {
    let mut base = vec![
        (CREDENTIALS_VAR.to_string(), "/keys/sa.json".to_string()),
        (PROJECT_ID_VAR.to_string(), PROJECT.to_string()),
    ];
    base.extend(entries.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
    ConfigSource::from_layers(base, Vec::new())
}

fn options(keyfile_dir: &Path) -> SyncOptions {
    SyncOptions {
        keyfile_path: keyfile_dir.join("networking.json"),
        ..SyncOptions::default()
    }
}

fn write_keyfile(dir: &TempDir, contents: &str) {
    std::fs::write(dir.path().join("networking.json"), contents).unwrap();
}

async fn run(config: &ConfigSource, dir: &TempDir, store: &InMemorySecretStore) -> SyncReport {
    let store = store.clone();
    sync::run_sync(config, options(dir.path()), |_settings| async move {
        Ok::<_, anyhow::Error>(store)
    })
    .await
    .expect("sync should run")
}

#[tokio::test]
async fn test_only_allow_listed_entries_are_synced() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();

    let report = run(&config(&[("GCP_REGION", "us-east1"), ("FOO", "bar")]), &dir, &store).await;

    assert_eq!(store.record_ids(), vec!["GCP_REGION"]);
    assert_eq!(store.versions("GCP_REGION"), vec!["us-east1"]);
    assert!(store.calls().iter().all(|call| call.secret_id() == "GCP_REGION"));
    assert_eq!(report.results().len(), 1);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_non_matching_entries_cause_no_store_calls() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();

    let report = run(
        &config(&[("FOO", "bar"), ("HOME", "/root"), ("gcp_region", "x")]),
        &dir,
        &store,
    )
    .await;

    assert!(store.calls().is_empty());
    assert!(report.results().is_empty());
}

#[tokio::test]
async fn test_each_selected_entry_gets_one_create_and_one_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();

    run(
        &config(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("SECRET_API_KEY", "abc"),
        ]),
        &dir,
        &store,
    )
    .await;

    for id in ["PORT", "JWT_SECRET", "SECRET_API_KEY"] {
        assert_eq!(store.create_count(id), 1, "{id}");
        assert_eq!(store.add_version_count(id), 1, "{id}");
    }
    assert_eq!(
        store.calls()[..2],
        [
            StoreCall::Create {
                project_id: PROJECT.to_string(),
                secret_id: "PORT".to_string(),
            },
            StoreCall::AddVersion {
                project_id: PROJECT.to_string(),
                secret_id: "PORT".to_string(),
                payload: "8080".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_two_runs_add_two_versions_and_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();
    let config = config(&[("SECRET_TOKEN", "same-value")]);

    let first = run(&config, &dir, &store).await;
    let second = run(&config, &dir, &store).await;

    assert_eq!(store.record_ids(), vec!["SECRET_TOKEN"]);
    assert_eq!(store.versions("SECRET_TOKEN"), vec!["same-value", "same-value"]);
    assert!(matches!(
        first.get("SECRET_TOKEN").unwrap().outcome,
        SecretOutcome::Created { .. }
    ));
    assert_eq!(
        second.get("SECRET_TOKEN").unwrap().outcome,
        SecretOutcome::VersionAdded {
            version: "projects/test-project/secrets/SECRET_TOKEN/versions/2".to_string()
        }
    );
}

#[tokio::test]
async fn test_keyfile_is_synced_first() {
    let dir = tempfile::tempdir().unwrap();
    write_keyfile(&dir, "{\"type\":\"service_account\"}");
    let store = InMemorySecretStore::new();

    let report = run(&config(&[("PORT", "8080")]), &dir, &store).await;

    assert_eq!(report.results()[0].secret_id, "GCP_KEYFILE");
    assert_eq!(report.results()[1].secret_id, "PORT");
    assert_eq!(
        store.versions("GCP_KEYFILE"),
        vec!["{\"type\":\"service_account\"}"]
    );
}

#[tokio::test]
async fn test_existing_keyfile_record_gets_new_version() {
    let dir = tempfile::tempdir().unwrap();
    write_keyfile(&dir, "rotated-key");
    let store = InMemorySecretStore::with_existing(&["GCP_KEYFILE"]);

    let report = run(&config(&[]), &dir, &store).await;

    assert_eq!(store.create_count("GCP_KEYFILE"), 1);
    assert_eq!(store.add_version_count("GCP_KEYFILE"), 1);
    assert_eq!(store.versions("GCP_KEYFILE"), vec!["rotated-key"]);
    assert!(matches!(
        report.get("GCP_KEYFILE").unwrap().outcome,
        SecretOutcome::VersionAdded { .. }
    ));
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_absent_keyfile_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();

    let report = run(&config(&[("PORT", "8080")]), &dir, &store).await;

    assert_eq!(store.create_count("GCP_KEYFILE"), 0);
    assert!(report.get("GCP_KEYFILE").is_none());
}

#[tokio::test]
async fn test_missing_credentials_stops_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let connected = AtomicBool::new(false);
    let config = ConfigSource::from_layers(
        vec![
            (PROJECT_ID_VAR.to_string(), PROJECT.to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ],
        Vec::new(),
    );

    let result = sync::run_sync(&config, options(dir.path()), |_settings| {
        connected.store(true, Ordering::SeqCst);
        async { Ok::<_, anyhow::Error>(InMemorySecretStore::new()) }
    })
    .await;

    assert!(matches!(result, Err(SyncError::MissingCredentials)));
    assert!(!connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_missing_project_id_stops_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let connected = AtomicBool::new(false);
    let config = ConfigSource::from_layers(
        vec![
            (CREDENTIALS_VAR.to_string(), "/keys/sa.json".to_string()),
            (PROJECT_ID_VAR.to_string(), String::new()),
        ],
        Vec::new(),
    );

    let result = sync::run_sync(&config, options(dir.path()), |_settings| {
        connected.store(true, Ordering::SeqCst);
        async { Ok::<_, anyhow::Error>(InMemorySecretStore::new()) }
    })
    .await;

    assert!(matches!(result, Err(SyncError::MissingProjectId)));
    assert!(!connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_connect_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let result = sync::run_sync(&config(&[("PORT", "8080")]), options(dir.path()), |_settings| async {
        Err::<InMemorySecretStore, _>(anyhow::anyhow!("no access token"))
    })
    .await;

    assert!(matches!(result, Err(SyncError::Client(_))));
}

#[tokio::test]
async fn test_create_failure_skips_only_that_secret() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();
    store.fail_create("SECRET_A", StoreErrorKind::PermissionDenied, "Permission denied");

    let report = run(&config(&[("SECRET_A", "a"), ("SECRET_B", "b")]), &dir, &store).await;

    assert_eq!(store.add_version_count("SECRET_A"), 0);
    assert_eq!(store.versions("SECRET_B"), vec!["b"]);
    assert_eq!(
        report.get("SECRET_A").unwrap().outcome,
        SecretOutcome::Failed {
            stage: FailureStage::Create,
            message: "Permission denied".to_string(),
        }
    );
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.created_count(), 1);
}

#[tokio::test]
async fn test_add_version_failure_skips_only_that_secret() {
    let dir = tempfile::tempdir().unwrap();
    let store = InMemorySecretStore::new();
    store.fail_add_version("PORT", StoreErrorKind::Unavailable, "HTTP 503");

    let report = run(&config(&[("PORT", "8080"), ("LOGS_BUCKET", "logs")]), &dir, &store).await;

    assert!(matches!(
        report.get("PORT").unwrap().outcome,
        SecretOutcome::Failed {
            stage: FailureStage::AddVersion,
            ..
        }
    ));
    assert_eq!(store.versions("LOGS_BUCKET"), vec!["logs"]);
    assert!(report.has_failures());
}

#[tokio::test]
async fn test_plan_sync_lists_ids_without_store() {
    let dir = tempfile::tempdir().unwrap();
    write_keyfile(&dir, "key");

    let planned = sync::plan_sync(
        &config(&[("FOO", "bar"), ("GCP_REGION", "us-east1")]),
        options(dir.path()),
    )
    .await
    .unwrap();

    assert_eq!(planned, vec!["GCP_KEYFILE", "GCP_REGION"]);
}
