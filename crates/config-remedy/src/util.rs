//! Loading helpers for callers that work from files
//!
//! The core never performs I/O; these helpers are the thin file-facing layer
//! used by the CLI and by integration code.

use anyhow::{Context, Result};
use std::path::Path;

use crate::rules::TagRule;

/// Read a device configuration file into memory.
///
/// # Errors
/// Returns an error when the file cannot be read.
pub fn load_device_config(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read device config {}", path.display()))
}

/// Load and validate tag rules from a YAML file.
///
/// The expected shape is a list of rules, each with `match_rules` (a list of
/// match-rule mappings) and `apply_tags` (a list of tag names).
///
/// # Errors
/// Returns an error when the file cannot be read or does not parse as a tag
/// rule list.
pub fn load_tag_rules(path: impl AsRef<Path>) -> Result<Vec<TagRule>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tag rules {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse tag rules {}", path.display()))
}
