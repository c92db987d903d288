//! # Constants
//!
//! Shared constants used by both binaries.
//!
//! Path defaults are relative to the working directory the tools are run
//! from (the repository root) and can be overridden on the command line.

/// Default overlay file merged under the process environment
pub const DEFAULT_ENV_FILE: &str = "Application/.env";

/// Default service-account key file synced as a single secret
pub const DEFAULT_KEYFILE_PATH: &str = "Application/keys/networking.json";

/// Secret id the key file contents are stored under
pub const DEFAULT_KEYFILE_SECRET_ID: &str = "GCP_KEYFILE";

/// Variable that must be present before anything is synced
pub const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Variable holding the target GCP project
pub const PROJECT_ID_VAR: &str = "PROJECT_ID";

/// Optional pre-minted OAuth2 access token
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Production Secret Manager endpoint
pub const DEFAULT_SECRET_MANAGER_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// GCE/GKE metadata server token endpoint (Workload Identity)
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// How long to wait for the metadata server before trying the next token source
pub const METADATA_TIMEOUT_SECS: u64 = 2;

/// Default per-request timeout for Secret Manager calls
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Secret Manager payload size limit (64KiB)
pub const MAX_SECRET_PAYLOAD_BYTES: usize = 65_536;

/// Maximum length of a Secret Manager secret id
pub const MAX_SECRET_ID_LEN: usize = 255;

/// Exact names synced regardless of prefix
pub const SYNCED_NAMES: [&str; 9] = [
    "PORT",
    "JWT_SECRET",
    "FIREBASE_DB_URL",
    "FUNCTION_COPY_URL",
    "FUNCTION_DELETE_URL",
    "REPOSITORY_NAME",
    "REGION_PROJECT",
    "LOGS_BUCKET",
    "SERVICE_ACCOUNT",
];

/// Name prefixes that mark a variable for syncing
pub const SYNCED_PREFIXES: [&str; 2] = ["GCP_", "SECRET_"];

/// File holding the current release version
pub const VERSION_FILE: &str = "VERSION";

/// Files rewritten by `bump-version` when none are given
pub const DEFAULT_VERSIONED_FILES: [&str; 2] =
    ["Pipeline/cloudbuild.yaml", "Application/views/index.ejs"];

/// Env fallback for `--env-file`
pub const ENV_FILE_VAR: &str = "SYNC_ENV_FILE";

/// Env fallback for `--keyfile`
pub const KEYFILE_VAR: &str = "SYNC_KEYFILE";

/// Env fallback for `--endpoint`
pub const ENDPOINT_VAR: &str = "SECRET_MANAGER_ENDPOINT";

/// Env fallback for `--metrics-file`
pub const METRICS_FILE_VAR: &str = "SYNC_METRICS_FILE";

/// Env fallback for `--log-level`
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Env fallback for `--log-format`
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Every variable the CLI reads for its own options; none may be synced
pub const CLI_ENV_VARS: [&str; 6] = [
    ENV_FILE_VAR,
    KEYFILE_VAR,
    ENDPOINT_VAR,
    METRICS_FILE_VAR,
    LOG_LEVEL_VAR,
    LOG_FORMAT_VAR,
];
