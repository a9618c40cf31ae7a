//! Generation dispatch: turning a selection of descriptors, documents, or
//! URLs into written output files via the external renderer.
//!
//! Every mode returns the number of successfully processed APIs (not the
//! number of files written). Document retrieval failures are the only
//! recoverable failures here: they are logged and skipped. Renderer and
//! write failures propagate and abort the run.

use crate::catalog::{EffectiveCatalog, mirror_url};
use crate::policy::Policy;
use crate::render::Renderer;
use crate::storage::ArtifactStore;
use crate::{ApiKey, Fetcher, Result};
use tracing::{info, warn};

/// Dispatches generation work for one run.
///
/// Holds references to the run's single fetcher, renderer, and destination
/// store; constructed once at run start.
pub struct Dispatcher<'a> {
    fetcher: &'a Fetcher,
    renderer: &'a dyn Renderer,
    store: &'a ArtifactStore,
    index_url: &'a str,
}

impl<'a> Dispatcher<'a> {
    /// Creates a dispatcher over the run's shared collaborators.
    pub fn new(
        fetcher: &'a Fetcher,
        renderer: &'a dyn Renderer,
        store: &'a ArtifactStore,
        index_url: &'a str,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            store,
            index_url,
        }
    }

    /// Renders one document already in hand and writes its files.
    pub fn generate_document(&self, document: &str) -> Result<()> {
        let files = self.renderer.render(document)?;
        self.store.write_files(&files)
    }

    /// Explicit-document mode: one unit of work per document.
    ///
    /// Returns the number of documents processed. Renderer failures abort
    /// the run; there is nothing recoverable at this stage.
    pub fn generate_documents(&self, documents: &[String]) -> Result<usize> {
        let mut count = 0;
        for document in documents {
            self.generate_document(document)?;
            count += 1;
        }
        Ok(count)
    }

    /// First-success mode for one logical API.
    ///
    /// Attempts each candidate URL in order. A retrieval failure logs a
    /// warning and advances to the next candidate; the first successful
    /// retrieval is rendered and counted, and no further candidates are
    /// attempted. Returns 1 on success, 0 when every candidate failed.
    pub async fn generate_first_success(
        &self,
        label: &str,
        candidates: &[String],
    ) -> Result<usize> {
        for url in candidates {
            match self.fetcher.fetch(url).await {
                Ok(document) => {
                    self.generate_document(&document)?;
                    info!("generated {label} from {url}");
                    return Ok(1);
                },
                Err(err) if err.is_retrieval_failure() => {
                    warn!("failed request, skipping {url}: {err}");
                },
                Err(err) => return Err(err),
            }
        }
        warn!("no candidate URL succeeded for {label}");
        Ok(0)
    }

    /// Accumulate mode over a flat URL list.
    ///
    /// Each URL is attempted independently; a failure is logged and
    /// skipped without preventing the rest. Returns the number of
    /// successful retrievals rendered.
    pub async fn generate_urls(&self, urls: &[String]) -> Result<usize> {
        let mut count = 0;
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(document) => {
                    self.generate_document(&document)?;
                    info!("generated client from {url}");
                    count += 1;
                },
                Err(err) if err.is_retrieval_failure() => {
                    warn!("failed request, skipping {url}: {err}");
                },
                Err(err) => return Err(err),
            }
        }
        Ok(count)
    }

    /// Named selection against the effective catalog.
    ///
    /// Paused keys and keys absent from the catalog are reported and
    /// skipped without any retrieval attempt; everything else expands into
    /// first-success mode over `[mirror, discovery_rest_url]`.
    pub async fn generate_apis(
        &self,
        requested: &[ApiKey],
        catalog: &EffectiveCatalog,
        policy: &Policy,
    ) -> Result<usize> {
        let mut count = 0;
        for key in requested {
            if policy.paused(key) {
                info!("{key} is paused, skipping");
                continue;
            }
            let Some(descriptor) = catalog.find(key) else {
                warn!("{key} is not in the list of discovered APIs, skipping");
                continue;
            };
            let candidates = self.candidates_for(key, &descriptor.discovery_rest_url);
            count += self.generate_first_success(&key.to_string(), &candidates).await?;
        }
        Ok(count)
    }

    /// Full-discovery sweep over the effective catalog.
    ///
    /// Paused descriptors are reported and skipped; with `preferred_only`,
    /// non-preferred descriptors are reported and skipped as well. All
    /// others go through the same first-success expansion as named
    /// selection.
    pub async fn sweep(
        &self,
        catalog: &EffectiveCatalog,
        policy: &Policy,
        preferred_only: bool,
    ) -> Result<usize> {
        let mut count = 0;
        for descriptor in catalog.entries() {
            let key = descriptor.key();
            if policy.paused(&key) {
                info!("{key} is paused, skipping");
                continue;
            }
            if preferred_only && !descriptor.preferred {
                info!("{key} is not the preferred version, skipping");
                continue;
            }
            let candidates = self.candidates_for(&key, &descriptor.discovery_rest_url);
            count += self.generate_first_success(&key.to_string(), &candidates).await?;
        }
        Ok(count)
    }

    /// Ordered candidate URLs: mirror first, documented fallback second.
    fn candidates_for(&self, key: &ApiKey, discovery_rest_url: &str) -> Vec<String> {
        let mut candidates = vec![mirror_url(self.index_url, key)];
        if !discovery_rest_url.is_empty() {
            candidates.push(discovery_rest_url.to_string());
        }
        candidates
    }
}
