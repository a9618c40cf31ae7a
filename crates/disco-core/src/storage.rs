//! Destination-directory primitives: artifact writes, unit listing, and
//! unit deletion.
//!
//! A generated unit is a top-level `<artifact_id>.rs` file paired with a
//! like-named support directory. The dispatcher only ever writes and
//! overwrites; the reconciler is the only component that deletes.

use crate::render::RenderedFiles;
use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File extension of a unit's top-level generated file.
pub const ARTIFACT_FILE_EXT: &str = "rs";

/// Handle on the destination directory for all dispatcher writes and
/// reconciler deletions.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Opens the destination directory, creating it if necessary.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            Error::Storage(format!(
                "failed to create destination directory '{}': {e}",
                root.display()
            ))
        })?;
        Ok(Self { root })
    }

    /// The destination root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes one rendered file set under the root.
    ///
    /// Parent directories are created as needed and existing files are
    /// overwritten. Files from a previous generation that are absent from
    /// the new mapping are left in place; removing them is the
    /// reconciler's job.
    pub fn write_files(&self, files: &RenderedFiles) -> Result<()> {
        for (relative, content) in files {
            let path = self.resolve(relative)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!(
                        "failed to create directory '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
            fs::write(&path, content).map_err(|e| {
                Error::Storage(format!("failed to write '{}': {e}", path.display()))
            })?;
            debug!("wrote {}", path.display());
        }
        Ok(())
    }

    /// Lists the identifiers of top-level generated units.
    ///
    /// A unit shows up as its support directory, its top-level generated
    /// file, or both; either spelling contributes the identifier.
    pub fn list_units(&self) -> Result<BTreeSet<String>> {
        let mut units = BTreeSet::new();
        let entries = fs::read_dir(&self.root).map_err(|e| {
            Error::Storage(format!(
                "failed to list destination directory '{}': {e}",
                self.root.display()
            ))
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Storage(format!("failed to read entry: {e}")))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if entry.path().is_dir() {
                units.insert(name.to_string());
            } else if let Some(stem) = name.strip_suffix(&format!(".{ARTIFACT_FILE_EXT}")) {
                units.insert(stem.to_string());
            }
        }
        Ok(units)
    }

    /// Deletes a unit's support directory and top-level file.
    ///
    /// Missing halves are ignored so a partially written unit can still be
    /// removed.
    pub fn remove_unit(&self, id: &str) -> Result<()> {
        validate_relative(id)?;
        let dir = self.root.join(id);
        if dir.is_dir() {
            fs::remove_dir_all(&dir).map_err(|e| {
                Error::Storage(format!("failed to remove '{}': {e}", dir.display()))
            })?;
        }
        let file = self.root.join(format!("{id}.{ARTIFACT_FILE_EXT}"));
        if file.is_file() {
            fs::remove_file(&file).map_err(|e| {
                Error::Storage(format!("failed to remove '{}': {e}", file.display()))
            })?;
        }
        Ok(())
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        validate_relative(relative)?;
        Ok(self.root.join(relative))
    }
}

/// Rejects paths that would escape the destination root.
///
/// Renderer output is untrusted input here: absolute paths and `..`
/// segments must stay inside the root.
fn validate_relative(relative: &str) -> Result<()> {
    let path = Path::new(relative);
    if relative.is_empty()
        || path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(Error::Storage(format!(
            "refusing to write outside the destination directory: '{relative}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn store() -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn write_files_creates_directories_and_overwrites() {
        let (_dir, store) = store();

        let mut files: RenderedFiles = BTreeMap::new();
        files.insert("books_v1.rs".into(), "pub mod old;".into());
        files.insert("books_v1/books_v1.json".into(), "{}".into());
        store.write_files(&files).unwrap();

        files.insert("books_v1.rs".into(), "pub mod new;".into());
        store.write_files(&files).unwrap();

        let written = fs::read_to_string(store.root().join("books_v1.rs")).unwrap();
        assert_eq!(written, "pub mod new;");
        assert!(store.root().join("books_v1/books_v1.json").is_file());
    }

    #[test]
    fn write_files_rejects_traversal() {
        let (_dir, store) = store();
        let mut files: RenderedFiles = BTreeMap::new();
        files.insert("../outside.rs".into(), "nope".into());
        let err = store.write_files(&files).expect_err("traversal must fail");
        assert!(matches!(err, Error::Storage(_)));

        let mut absolute: RenderedFiles = BTreeMap::new();
        absolute.insert("/tmp/outside.rs".into(), "nope".into());
        assert!(store.write_files(&absolute).is_err());
    }

    #[test]
    fn list_units_pairs_files_and_directories() {
        let (_dir, store) = store();
        fs::create_dir(store.root().join("a_1")).unwrap();
        fs::write(store.root().join("a_1.rs"), "").unwrap();
        fs::write(store.root().join("b_2.rs"), "").unwrap();
        fs::create_dir(store.root().join("c_3")).unwrap();
        // Stray non-unit file is ignored.
        fs::write(store.root().join("notes.txt"), "").unwrap();

        let units = store.list_units().unwrap();
        let expected: BTreeSet<String> =
            ["a_1", "b_2", "c_3"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(units, expected);
    }

    #[test]
    fn remove_unit_deletes_both_halves() {
        let (_dir, store) = store();
        fs::create_dir(store.root().join("a_1")).unwrap();
        fs::write(store.root().join("a_1/doc.json"), "{}").unwrap();
        fs::write(store.root().join("a_1.rs"), "").unwrap();

        store.remove_unit("a_1").unwrap();
        assert!(!store.root().join("a_1").exists());
        assert!(!store.root().join("a_1.rs").exists());

        // Removing a unit that only has one half present still succeeds.
        fs::write(store.root().join("b_2.rs"), "").unwrap();
        store.remove_unit("b_2").unwrap();
        assert!(!store.root().join("b_2.rs").exists());
    }
}
