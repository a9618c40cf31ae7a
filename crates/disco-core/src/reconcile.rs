//! Reconciliation: deleting locally generated artifacts that no longer
//! correspond to any entry in the effective catalog.

use crate::catalog::EffectiveCatalog;
use crate::storage::ArtifactStore;
use crate::Result;
use tracing::{debug, info};

/// Removes every on-disk unit whose identifier is not in the catalog's
/// artifact-id set, returning the removal count.
///
/// Paused-but-cataloged descriptors keep their artifacts: pause only
/// suppresses regeneration, it does not remove the descriptor from the
/// catalog. One destructive pass, no staging, no dry-run at this layer.
pub fn reconcile(store: &ArtifactStore, catalog: &EffectiveCatalog) -> Result<usize> {
    let keep = catalog.artifact_ids();
    let mut removed = 0;

    for unit in store.list_units()? {
        if keep.contains(&unit) {
            debug!("{unit} is still cataloged, keeping");
            continue;
        }
        info!("removing stale artifact {unit}");
        store.remove_unit(&unit)?;
        removed += 1;
    }

    Ok(removed)
}
