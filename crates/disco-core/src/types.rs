//! Core data types shared across the catalog, dispatcher, and reconciler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key identifying one API revision: `(name, version)`.
///
/// Config files and CLI arguments spell keys as `"name.version"`; parsing
/// happens once at the boundary so equality and hashing never depend on
/// string formatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiKey {
    /// API name as published in the discovery index.
    pub name: String,
    /// API version label, e.g. `v1` or `v1.1`.
    pub version: String,
}

impl ApiKey {
    /// Creates a key from its parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parses a `"name.version"` spelling.
    ///
    /// The split happens at the first `.` since names never contain dots
    /// while versions may (`v1.1`). Returns `None` when either side would
    /// be empty.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        let (name, version) = id.split_once('.')?;
        if name.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self::new(name, version))
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.version)
    }
}

/// One entry of the remote discovery index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescriptor {
    /// API name.
    pub name: String,
    /// API version label.
    pub version: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the publisher marks this version as the preferred one.
    #[serde(default)]
    pub preferred: bool,
    /// Documented fallback location of the raw description document.
    #[serde(default)]
    pub discovery_rest_url: String,
}

impl ApiDescriptor {
    /// The composite lookup key for this descriptor.
    #[must_use]
    pub fn key(&self) -> ApiKey {
        ApiKey::new(self.name.clone(), self.version.clone())
    }

    /// The `"name.version"` rendering used in config files and logs.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}.{}", self.name, self.version)
    }

    /// The canonical on-disk identifier for this descriptor's artifact.
    #[must_use]
    pub fn artifact_id(&self) -> String {
        artifact_id(&self.name, &self.version)
    }
}

impl fmt::Display for ApiDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.version)
    }
}

/// Derives the canonical artifact id from an API name and version.
///
/// The name is lower-cased with underscores inserted at word boundaries,
/// the version has its dots replaced with underscores, and the two halves
/// are joined with an underscore: `AdExchange` + `v1.1` becomes
/// `ad_exchange_v1_1`.
#[must_use]
pub fn artifact_id(name: &str, version: &str) -> String {
    format!(
        "{}_{}",
        to_snake_case(name),
        to_snake_case(&version.replace('.', "_"))
    )
}

/// Lower-cases an identifier, inserting underscores at word boundaries.
///
/// A boundary is an uppercase letter following a lowercase letter or
/// digit. Non-alphanumeric characters collapse into a single underscore.
fn to_snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() {
                if prev_lower_or_digit {
                    out.push('_');
                }
                for lower in ch.to_lowercase() {
                    out.push(lower);
                }
                prev_lower_or_digit = false;
            } else {
                out.push(ch);
                prev_lower_or_digit = true;
            }
        } else {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }
    out.trim_end_matches('_').to_string()
}
