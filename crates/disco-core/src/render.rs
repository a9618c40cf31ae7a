//! Seam to the external code renderer.
//!
//! The renderer turns one raw API description document into a set of
//! output files. Its internals (templates, language, formatting) are not
//! part of this crate; the dispatcher only depends on this trait.

use crate::Result;
use std::collections::BTreeMap;

/// Rendered output: relative file path under the destination directory
/// mapped to file content. Ordered so writes are deterministic.
pub type RenderedFiles = BTreeMap<String, String>;

/// Turns one raw description document into output files.
pub trait Renderer {
    /// Renders a document.
    ///
    /// Errors from this method are fatal to the run; the dispatcher does
    /// not catch them.
    fn render(&self, document: &str) -> Result<RenderedFiles>;
}
