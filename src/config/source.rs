//! # Config Source
//!
//! Ordered view of the process environment merged with a `.env` overlay.
//!
//! Merge rules:
//! - process variables come first, in the order the OS reports them
//! - overlay entries are appended in file order
//! - an overlay entry never overrides a variable the process already has

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};
use zeroize::Zeroize;

/// Ordered name/value configuration, read-only once loaded
#[derive(Clone, Default)]
pub struct ConfigSource {
    entries: Vec<(String, String)>,
}

impl ConfigSource {
    /// Load the process environment and merge the overlay file at `overlay_path`
    ///
    /// A missing overlay file is not an error; only the process environment is used.
    ///
    /// # Errors
    /// Returns an error if the overlay file exists but cannot be read
    pub fn load(overlay_path: &Path) -> Result<Self> {
        let overlay = read_overlay(overlay_path)?.unwrap_or_default();
        Ok(Self::from_layers(process_vars(), overlay))
    }

    /// Merge two layers of variables; `base` takes precedence over `overlay`
    pub fn from_layers<B, O>(base: B, overlay: O) -> Self
    where
        B: IntoIterator<Item = (String, String)>,
        O: IntoIterator<Item = (String, String)>,
    {
        let mut source = Self::default();
        for (name, value) in base.into_iter().chain(overlay) {
            source.insert_if_absent(name, value);
        }
        source
    }

    fn insert_if_absent(&mut self, name: String, value: String) {
        if self.contains(&name) {
            return;
        }
        self.entries.push((name, value));
    }

    /// Value for `name`, if set
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value for `name`, treating an empty or whitespace-only value as unset
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    /// Entries in load order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for ConfigSource {
    fn drop(&mut self) {
        for (_, value) in &mut self.entries {
            value.zeroize();
        }
    }
}

// Values are secrets; only names are printed.
impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSource")
            .field(
                "names",
                &self.entries.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Process environment, skipping variables that are not valid UTF-8
fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(name, value)| {
            let lossy_name = name.to_string_lossy().into_owned();
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                _ => {
                    debug!("Skipping non-UTF-8 environment entry: {lossy_name}");
                    None
                }
            }
        })
        .collect()
}

/// Parse a `.env` file into ordered entries
///
/// Returns `Ok(None)` if the file does not exist.
///
/// A line that does not parse is logged and skipped; the rest of the file
/// still loads.
///
/// # Errors
/// Returns an error if the file exists but cannot be opened or read
pub fn read_overlay(path: &Path) -> Result<Option<Vec<(String, String)>>> {
    if !path.exists() {
        warn!(
            "Overlay file {} not found, using process environment only",
            path.display()
        );
        return Ok(None);
    }

    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open overlay file: {}", path.display()))?;

    let mut entries = Vec::new();
    for item in iter {
        match item {
            Ok(entry) => entries.push(entry),
            Err(e @ dotenvy::Error::LineParse(..)) => {
                warn!("Skipping malformed line in {}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read overlay file: {}", path.display()));
            }
        }
    }

    debug!(
        "Loaded {} entries from overlay file {}",
        entries.len(),
        path.display()
    );
    Ok(Some(entries))
}
