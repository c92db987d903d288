//! # Sync Report
//!
//! Per-secret outcomes of a run, in processing order, and the console lines
//! printed for them.

use std::fmt;

/// Result of the record-creation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was created
    Created,
    /// The record was already there; creation was a no-op
    AlreadyExists,
}

/// Step at which a secret sync stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Local checks (secret id, payload size); no store call was made
    Validation,
    /// Reading the key file
    Read,
    /// Creating the record; no version was added
    Create,
    /// Adding the version after a successful or duplicate create
    AddVersion,
}

/// Outcome of syncing one secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOutcome {
    /// Record created and first version added
    Created { version: String },
    /// Record already existed; a new version was added
    VersionAdded { version: String },
    /// The secret was skipped
    Failed { stage: FailureStage, message: String },
}

impl SecretOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SecretOutcome::Failed { .. })
    }

    pub fn from_create(create: CreateOutcome, version: String) -> Self {
        match create {
            CreateOutcome::Created => SecretOutcome::Created { version },
            CreateOutcome::AlreadyExists => SecretOutcome::VersionAdded { version },
        }
    }
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretResult {
    pub secret_id: String,
    pub outcome: SecretOutcome,
}

impl SecretResult {
    pub fn new(secret_id: impl Into<String>, outcome: SecretOutcome) -> Self {
        Self {
            secret_id: secret_id.into(),
            outcome,
        }
    }
}

/// Last path segment of a version resource name (`.../versions/3` -> `3`)
fn version_number(version: &str) -> &str {
    version.rsplit('/').next().unwrap_or(version)
}

impl fmt::Display for SecretResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.secret_id;
        match &self.outcome {
            SecretOutcome::Created { version } => write!(
                f,
                "✔ Created secret: {id}, added version {}.",
                version_number(version)
            ),
            SecretOutcome::VersionAdded { version } => write!(
                f,
                "🔒 Secret already exists: {id}, added version {}.",
                version_number(version)
            ),
            SecretOutcome::Failed { stage, message } => match stage {
                FailureStage::Validation => write!(f, "❌ Skipped secret {id}: {message}"),
                FailureStage::Read => write!(f, "❌ Error reading value for {id}: {message}"),
                FailureStage::Create => write!(f, "❌ Error creating secret {id}: {message}"),
                FailureStage::AddVersion => {
                    write!(f, "❌ Error adding version to secret {id}: {message}")
                }
            },
        }
    }
}

/// All outcomes of a run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    results: Vec<SecretResult>,
}

impl SyncReport {
    pub fn push(&mut self, result: SecretResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[SecretResult] {
        &self.results
    }

    pub fn get(&self, secret_id: &str) -> Option<&SecretResult> {
        self.results.iter().find(|result| result.secret_id == secret_id)
    }

    pub fn created_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, SecretOutcome::Created { .. }))
    }

    pub fn existing_count(&self) -> usize {
        self.count(|outcome| matches!(outcome, SecretOutcome::VersionAdded { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(SecretOutcome::is_failure)
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    fn count(&self, predicate: impl Fn(&SecretOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| predicate(&result.outcome))
            .count()
    }
}
