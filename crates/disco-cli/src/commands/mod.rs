//! Command implementations for the disco CLI.

pub mod generate;
pub mod list;

use anyhow::Result;
use disco_core::Policy;
use std::path::Path;
use tracing::debug;

/// Resolves the policy overlay for this run.
///
/// An explicitly given path must load (missing or malformed files are
/// fatal). Without one, a `policy.toml` in the platform config directory
/// is used when present; otherwise the overlay is empty.
pub(crate) fn load_policy(explicit: Option<&Path>) -> Result<Policy> {
    if let Some(path) = explicit {
        return Ok(Policy::load(path)?);
    }
    if let Some(default) = Policy::default_path() {
        if default.exists() {
            debug!("using policy overlay at {}", default.display());
            return Ok(Policy::load(&default)?);
        }
    }
    Ok(Policy::empty())
}
