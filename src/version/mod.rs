//! # Version Bump
//!
//! Rewrites the release version in `VERSION` and in every file that embeds it
//! (build pipeline, rendered views).

use crate::constants::VERSION_FILE;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("New version must not be empty")]
    EmptyNewVersion,
    #[error("Current version in {} is empty", .0.display())]
    EmptyCurrentVersion(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBump {
    pub old_version: String,
    pub new_version: String,
    /// Files rewritten, with the number of replacements in each
    pub files: Vec<(PathBuf, usize)>,
}

impl VersionBump {
    /// Whether anything was changed
    pub fn is_noop(&self) -> bool {
        self.old_version == self.new_version
    }
}

fn read(path: &Path) -> Result<String, VersionError> {
    std::fs::read_to_string(path).map_err(|source| VersionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), VersionError> {
    std::fs::write(path, contents).map_err(|source| VersionError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Current version, with surrounding whitespace removed
///
/// # Errors
/// Returns [`VersionError::Read`] if the file cannot be read
pub fn read_current_version(version_file: &Path) -> Result<String, VersionError> {
    Ok(read(version_file)?.trim().to_string())
}

/// Replace every occurrence of `old` with `new` in `path`
///
/// Returns the number of replacements. The file is only written when
/// something changed.
///
/// # Errors
/// Returns an error if the file cannot be read or written
pub fn update_version_in_file(path: &Path, old: &str, new: &str) -> Result<usize, VersionError> {
    let contents = read(path)?;
    let count = contents.matches(old).count();
    if count > 0 {
        write(path, &contents.replace(old, new))?;
    }
    Ok(count)
}

/// Bump the version under `root` and rewrite `files` (relative to `root`)
///
/// # Errors
/// - [`VersionError::EmptyNewVersion`] for a blank `new_version`
/// - [`VersionError::EmptyCurrentVersion`] if `VERSION` is blank
/// - read/write errors naming the offending path
pub fn update_version_in_files<P: AsRef<Path>>(
    root: &Path,
    new_version: &str,
    files: &[P],
) -> Result<VersionBump, VersionError> {
    let new_version = new_version.trim();
    if new_version.is_empty() {
        return Err(VersionError::EmptyNewVersion);
    }

    let version_path = root.join(VERSION_FILE);
    let old_version = read_current_version(&version_path)?;
    if old_version.is_empty() {
        return Err(VersionError::EmptyCurrentVersion(version_path));
    }

    if old_version == new_version {
        info!("Version is already {}, nothing to do", old_version);
        return Ok(VersionBump {
            old_version,
            new_version: new_version.to_string(),
            files: Vec::new(),
        });
    }

    // Check every target up front so a missing file leaves VERSION untouched
    let targets: Vec<PathBuf> = files.iter().map(|file| root.join(file)).collect();
    if let Some(missing) = targets.iter().find(|path| !path.is_file()) {
        return Err(VersionError::Read {
            path: missing.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    write(&version_path, new_version)?;

    let mut updated = Vec::with_capacity(targets.len());
    for path in targets {
        let count = update_version_in_file(&path, &old_version, new_version)?;
        updated.push((path, count));
    }

    let list = updated
        .iter()
        .map(|(path, _)| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    info!("Version {} updated to {} in files: {}", old_version, new_version, list);

    Ok(VersionBump {
        old_version,
        new_version: new_version.to_string(),
        files: updated,
    })
}
