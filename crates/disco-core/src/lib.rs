//! # disco-core
//!
//! Core functionality for disco - keeping locally generated API client
//! artifacts synchronized with a remotely published discovery catalog.
//!
//! For each API listed in the remote index, a run decides whether to
//! (re)generate its client artifact, skip it, or remove its stale local
//! artifact, according to an exclude / include / pause overlay loaded from
//! a local policy file.
//!
//! ## Architecture
//!
//! - **Policy**: the typed exclude/include/pause overlay, parsed once at
//!   load time
//! - **Catalog**: one-shot fetch of the remote index plus the
//!   exclude-then-include overlay producing the run's effective catalog
//! - **Dispatch**: selection modes that resolve candidate document URLs,
//!   retrieve documents, and delegate to the renderer
//! - **Reconcile**: deletion of on-disk artifacts no longer cataloged
//!
//! Everything is built once at run start and passed by reference: the
//! catalog is fetched and filtered exactly once per run, and the
//! dispatcher and reconciler each run at most once, in either order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use disco_core::{
//!     catalog, dispatch::Dispatcher, policy::Policy, reconcile::reconcile,
//!     ArtifactStore, Fetcher, Result,
//! };
//! # use disco_core::render::{RenderedFiles, Renderer};
//! # struct NullRenderer;
//! # impl Renderer for NullRenderer {
//! #     fn render(&self, _: &str) -> Result<RenderedFiles> { Ok(RenderedFiles::new()) }
//! # }
//!
//! # async fn run() -> Result<()> {
//! let policy = Policy::empty();
//! let fetcher = Fetcher::new()?;
//! let raw = catalog::fetch_directory(&fetcher, catalog::DISCOVERY_INDEX_URL).await?;
//! let effective = catalog::EffectiveCatalog::build(raw, &policy);
//!
//! let store = ArtifactStore::new("generated")?;
//! let renderer = NullRenderer;
//! let dispatcher =
//!     Dispatcher::new(&fetcher, &renderer, &store, catalog::DISCOVERY_INDEX_URL);
//! let generated = dispatcher.sweep(&effective, &policy, true).await?;
//! let removed = reconcile(&store, &effective)?;
//! println!("{generated} generated, {removed} removed");
//! # Ok(())
//! # }
//! ```

/// Discovery catalog fetch and the effective-catalog overlay
pub mod catalog;
/// Generation dispatch across selection modes
pub mod dispatch;
/// Error types and result aliases
pub mod error;
/// HTTP fetching for the index and description documents
pub mod fetcher;
/// Exclude / include / pause policy overlay
pub mod policy;
/// Reconciliation of the artifact directory against the catalog
pub mod reconcile;
/// Renderer seam consumed by the dispatcher
pub mod render;
/// Destination-directory storage primitives
pub mod storage;
/// Core data types and structures
pub mod types;

// Re-export commonly used types
pub use catalog::{DISCOVERY_INDEX_URL, EffectiveCatalog, fetch_directory, mirror_url};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use policy::{IncludeEntry, Policy};
pub use reconcile::reconcile;
pub use render::{RenderedFiles, Renderer};
pub use storage::{ARTIFACT_FILE_EXT, ArtifactStore};
pub use types::{ApiDescriptor, ApiKey, artifact_id};
