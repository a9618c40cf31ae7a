//! Built-in template renderer.
//!
//! Turns one raw discovery document into the on-disk unit for its API: a
//! top-level `<artifact_id>.rs` module plus a like-named support directory
//! holding the pretty-printed document and a short README. The renderer is
//! an external collaborator from the dispatcher's point of view; swapping
//! in a richer code generator only requires another `Renderer` impl.

use disco_core::render::{RenderedFiles, Renderer};
use disco_core::{ARTIFACT_FILE_EXT, Error, Result, artifact_id};
use serde_json::Value;

/// Renders discovery documents into minimal Rust client scaffolding.
#[derive(Debug, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Creates the renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, document: &str) -> Result<RenderedFiles> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| Error::Render(format!("description document is not valid JSON: {e}")))?;

        let name = required_str(&value, "name")?;
        let version = required_str(&value, "version")?;
        let id = artifact_id(name, version);

        let title = value["title"].as_str().unwrap_or(name);
        let description = value["description"].as_str().unwrap_or_default();
        let documentation = value["documentationLink"].as_str().unwrap_or_default();
        let base_url = base_url(&value);

        let pretty = serde_json::to_string_pretty(&value)
            .map_err(|e| Error::Render(format!("failed to re-serialize document: {e}")))?;

        let mut files = RenderedFiles::new();
        files.insert(
            format!("{id}.{ARTIFACT_FILE_EXT}"),
            module_file(&id, name, version, title, &base_url),
        );
        files.insert(format!("{id}/{id}.json"), pretty);
        files.insert(
            format!("{id}/README.md"),
            readme_file(title, name, version, description, documentation),
        );
        Ok(files)
    }
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value[field]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::Render(format!("description document is missing '{field}'")))
}

/// Request endpoint: `rootUrl` + `servicePath` when present, `baseUrl`
/// otherwise.
fn base_url(value: &Value) -> String {
    match (value["rootUrl"].as_str(), value["servicePath"].as_str()) {
        (Some(root), Some(path)) => format!("{}{}", root.trim_end_matches('/'), ensure_leading_slash(path)),
        _ => value["baseUrl"].as_str().unwrap_or_default().to_string(),
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn module_file(id: &str, name: &str, version: &str, title: &str, base_url: &str) -> String {
    format!(
        "// Generated by disco. Do not edit by hand.\n\
         //! {title} bindings ({name} {version}).\n\
         \n\
         /// API name as published in the discovery index.\n\
         pub const API_NAME: &str = {name:?};\n\
         /// API version label.\n\
         pub const API_VERSION: &str = {version:?};\n\
         /// Endpoint requests are issued against.\n\
         pub const BASE_URL: &str = {base_url:?};\n\
         \n\
         /// Raw discovery document this module was generated from.\n\
         pub const DISCOVERY_DOCUMENT: &str = include_str!(\"{id}/{id}.json\");\n"
    )
}

fn readme_file(
    title: &str,
    name: &str,
    version: &str,
    description: &str,
    documentation: &str,
) -> String {
    let mut out = format!("# {title}\n\nGenerated client for `{name}` `{version}`.\n");
    if !description.is_empty() {
        out.push_str(&format!("\n{description}\n"));
    }
    if !documentation.is_empty() {
        out.push_str(&format!("\nUpstream documentation: <{documentation}>\n"));
    }
    out
}
