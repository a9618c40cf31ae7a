//! Policy overlay: the local exclude / include / pause rules layered on
//! top of the fetched catalog.
//!
//! The overlay lives in a TOML file. Every key is optional and defaults to
//! an empty collection; no other defaults exist:
//!
//! ```toml
//! exclude = ["adsense.v1", "blogger.v2"]
//! pause = ["books.v1"]
//!
//! [[include]]
//! name = "internal"
//! version = "v1"
//! discovery_rest_url = "https://internal.example/discovery/v1/apis/internal/v1/rest"
//! ```
//!
//! Parsing happens once at load time into typed collections keyed by
//! [`ApiKey`], so membership checks never depend on string formatting.

use crate::{ApiDescriptor, ApiKey, Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A catalog entry supplied locally through the `include` overlay.
///
/// Only `name` and `version` are required; the remaining descriptor fields
/// default the same way absent index fields do.
#[derive(Debug, Clone, Deserialize)]
pub struct IncludeEntry {
    /// API name.
    pub name: String,
    /// API version label.
    pub version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether this version should count as preferred.
    #[serde(default)]
    pub preferred: bool,
    /// Location of the raw description document.
    #[serde(default)]
    pub discovery_rest_url: String,
}

impl IncludeEntry {
    /// Builds the descriptor appended to the effective catalog.
    #[must_use]
    pub fn to_descriptor(&self) -> ApiDescriptor {
        ApiDescriptor {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            preferred: self.preferred,
            discovery_rest_url: self.discovery_rest_url.clone(),
        }
    }
}

/// Raw on-disk shape of the policy file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyFile {
    exclude: Vec<String>,
    include: Vec<IncludeEntry>,
    pause: Vec<String>,
}

/// The exclude / include / pause overlay, read-only after load.
#[derive(Debug, Default)]
pub struct Policy {
    exclude: HashSet<ApiKey>,
    include: Vec<IncludeEntry>,
    pause: HashSet<ApiKey>,
}

impl Policy {
    /// Loads the overlay from a TOML file.
    ///
    /// A missing or malformed file is fatal: downstream components assume
    /// a valid (possibly empty) overlay and there are no partial results.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read policy file '{}': {e}", path.display()))
        })?;
        let file: PolicyFile = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("failed to parse policy file '{}': {e}", path.display()))
        })?;
        let policy = Self::from_file(file)?;
        debug!(
            "loaded policy: {} excluded, {} included, {} paused",
            policy.exclude.len(),
            policy.include.len(),
            policy.pause.len()
        );
        Ok(policy)
    }

    /// An overlay with every collection empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_file(file: PolicyFile) -> Result<Self> {
        Ok(Self {
            exclude: parse_keys(&file.exclude, "exclude")?,
            pause: parse_keys(&file.pause, "pause")?,
            include: file.include,
        })
    }

    /// Whether the overlay drops this key from the catalog entirely.
    #[must_use]
    pub fn excluded(&self, key: &ApiKey) -> bool {
        self.exclude.contains(key)
    }

    /// Whether the overlay retains this key in the catalog but suppresses
    /// its regeneration.
    #[must_use]
    pub fn paused(&self, key: &ApiKey) -> bool {
        self.pause.contains(key)
    }

    /// Entries to append to the catalog after exclusion is applied.
    #[must_use]
    pub fn includes(&self) -> &[IncludeEntry] {
        &self.include
    }

    /// Default overlay location in the platform config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "outfitter", "disco")
            .map(|dirs| dirs.config_dir().join("policy.toml"))
    }
}

fn parse_keys(ids: &[String], field: &str) -> Result<HashSet<ApiKey>> {
    ids.iter()
        .map(|id| {
            ApiKey::parse(id).ok_or_else(|| {
                Error::Config(format!(
                    "invalid id '{id}' in policy '{field}' list (expected name.version)"
                ))
            })
        })
        .collect()
}
