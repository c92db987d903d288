//! # Selection Policy
//!
//! Decides which configuration entries are pushed to Secret Manager.
//! Matching is case-sensitive.

use crate::config::ConfigSource;
use crate::constants::{SYNCED_NAMES, SYNCED_PREFIXES};

/// Whether a variable name is on the allow-list
pub fn is_synced(name: &str) -> bool {
    SYNCED_NAMES.contains(&name) || SYNCED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Selected entries, in load order
pub fn select(config: &ConfigSource) -> impl Iterator<Item = (&str, &str)> {
    config.iter().filter(|(name, _)| is_synced(name))
}
