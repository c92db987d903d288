//! Key file loading.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

/// Read the key file as text
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read as UTF-8 text
pub async fn read_keyfile(path: &Path) -> Result<Option<Zeroizing<String>>> {
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("Failed to check key file {}", path.display()))?;
    if !exists {
        debug!("Key file {} not found, skipping", path.display());
        return Ok(None);
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read key file {}", path.display()))?;
    debug!("Read key file {} ({} bytes)", path.display(), contents.len());
    Ok(Some(Zeroizing::new(contents)))
}
