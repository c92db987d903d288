//! # Configuration
//!
//! Loading of the merged environment and the validated run settings.

mod settings;
mod source;

pub use settings::{SyncOptions, SyncSettings};
pub use source::{read_overlay, ConfigSource};
