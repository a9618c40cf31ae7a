//! Generate command implementation

use anyhow::{Context, Result, bail};
use colored::Colorize;
use disco_core::{
    ApiKey, ArtifactStore, Dispatcher, EffectiveCatalog, Fetcher, fetch_directory, reconcile,
};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::renderer::TemplateRenderer;

/// Options for one generate run, assembled from the parsed CLI.
pub struct GenerateParams {
    /// Destination directory for generated artifacts.
    pub dest: PathBuf,
    /// Raw document URLs, processed in accumulate mode.
    pub urls: Vec<String>,
    /// Local document files, processed in explicit-document mode.
    pub files: Vec<PathBuf>,
    /// Sweep the full effective catalog.
    pub from_discovery: bool,
    /// With the sweep, skip APIs not marked preferred.
    pub preferred_only: bool,
    /// Named APIs (`name.version`) to generate against the catalog.
    pub apis: Vec<String>,
    /// Optional file of additional ids, one per line.
    pub names: Option<PathBuf>,
    /// Optional file to write the effective catalog's ids to.
    pub names_out: Option<PathBuf>,
    /// Remove artifacts no longer present in the catalog.
    pub clean: bool,
}

/// Execute the generate command.
pub async fn execute(
    params: GenerateParams,
    policy_path: Option<&Path>,
    index_url: &str,
    quiet: bool,
) -> Result<()> {
    let requested = requested_keys(&params)?;
    warn_on_odd_urls(&params.urls, quiet);

    let needs_catalog = params.from_discovery
        || !requested.is_empty()
        || params.names_out.is_some()
        || params.clean;

    // Policy loads before any network traffic; a bad overlay aborts the
    // run ahead of the catalog fetch.
    let policy = if needs_catalog {
        super::load_policy(policy_path)?
    } else {
        disco_core::Policy::empty()
    };

    let fetcher = Fetcher::new()?;
    let catalog = if needs_catalog {
        let raw = fetch_directory(&fetcher, index_url).await?;
        Some(EffectiveCatalog::build(raw, &policy))
    } else {
        None
    };

    let store = ArtifactStore::new(&params.dest)?;
    let renderer = TemplateRenderer::new();
    let dispatcher = Dispatcher::new(&fetcher, &renderer, &store, index_url);

    let mut generated = 0;

    if !params.files.is_empty() {
        let mut documents = Vec::with_capacity(params.files.len());
        for path in &params.files {
            let document = fs::read_to_string(path)
                .with_context(|| format!("failed to read document '{}'", path.display()))?;
            documents.push(document);
        }
        generated += dispatcher.generate_documents(&documents)?;
    }

    if !params.urls.is_empty() {
        generated += dispatcher.generate_urls(&params.urls).await?;
    }

    let mut removed = None;
    if let Some(catalog) = &catalog {
        if !requested.is_empty() {
            generated += dispatcher.generate_apis(&requested, catalog, &policy).await?;
        }
        if params.from_discovery {
            generated += dispatcher.sweep(catalog, &policy, params.preferred_only).await?;
        }
        if let Some(out) = &params.names_out {
            write_names(out, catalog)?;
        }
        if params.clean {
            removed = Some(reconcile(&store, catalog)?);
        }
    }

    if !quiet {
        println!("{} {generated} API client(s)", "✓ Generated".green());
        if let Some(removed) = removed {
            println!("{} {removed} stale artifact(s)", "✓ Removed".green());
        }
    }

    Ok(())
}

/// Collects the named selection: `--api` flags plus the `--names` file.
fn requested_keys(params: &GenerateParams) -> Result<Vec<ApiKey>> {
    let mut requested = Vec::new();
    for id in &params.apis {
        requested.push(parse_key(id)?);
    }
    if let Some(path) = &params.names {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read names file '{}'", path.display()))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            requested.push(parse_key(line)?);
        }
    }
    Ok(requested)
}

fn parse_key(id: &str) -> Result<ApiKey> {
    match ApiKey::parse(id) {
        Some(key) => Ok(key),
        None => bail!("invalid API id '{id}' (expected name.version)"),
    }
}

fn write_names(path: &Path, catalog: &EffectiveCatalog) -> Result<()> {
    let mut contents = String::new();
    for descriptor in catalog.entries() {
        contents.push_str(&descriptor.id());
        contents.push('\n');
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write names file '{}'", path.display()))
}

fn warn_on_odd_urls(urls: &[String], quiet: bool) {
    if quiet {
        return;
    }
    for url in urls {
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {},
            Ok(parsed) => {
                eprintln!(
                    "Warning: URL scheme '{}' may not be supported for fetching ({url})",
                    parsed.scheme()
                );
            },
            Err(_) => eprintln!("Warning: URL appears invalid: {url}"),
        }
    }
}
