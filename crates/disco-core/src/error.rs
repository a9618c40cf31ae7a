//! Error types and handling for disco-core operations.
//!
//! All public functions in disco-core return `Result<T, Error>`. The variants
//! map onto the failure classes of a sync run:
//!
//! - **Config**: policy overlay file missing or malformed; fatal before any
//!   network traffic.
//! - **CatalogFetch**: the discovery index could not be fetched or decoded;
//!   fatal, there is no local fallback catalog.
//! - **Network / NotFound**: a single document retrieval failed. The
//!   dispatcher treats these as recoverable and skips to the next candidate
//!   URL; everywhere else they propagate.
//! - **Render**: the code renderer rejected a successfully retrieved
//!   document; fatal and aborts the run.
//! - **Storage / Io**: a write or delete under the destination directory
//!   failed; fatal, with no rollback of files already written this run.

use thiserror::Error;

/// The main error type for disco-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers file system operations like reading policy files or local
    /// description documents. The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers HTTP requests for description documents. The underlying
    /// `reqwest::Error` is preserved for detailed connection information.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Requested resource was not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Policy overlay file is missing, unreadable, or malformed.
    ///
    /// Downstream components assume a valid (possibly empty) overlay, so
    /// there are no partial results: the run aborts before the catalog is
    /// fetched.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote discovery index could not be fetched or decoded.
    #[error("Catalog fetch error: {0}")]
    CatalogFetch(String),

    /// The external renderer failed on a retrieved document.
    #[error("Render error: {0}")]
    Render(String),

    /// A write or delete under the destination directory failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the dispatcher may skip past this error when it occurs
    /// during a per-API document retrieval.
    ///
    /// Only transport-level failures qualify; render and storage failures
    /// abort the run regardless of where they surface.
    #[must_use]
    pub const fn is_retrieval_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::NotFound(_))
    }

    /// Short category label used in log lines.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not-found",
            Self::Config(_) => "config",
            Self::CatalogFetch(_) => "catalog",
            Self::Render(_) => "render",
            Self::Storage(_) => "storage",
        }
    }
}

/// Convenient result alias used throughout disco-core.
pub type Result<T> = std::result::Result<T, Error>;
