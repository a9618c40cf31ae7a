//! List command implementation

use anyhow::Result;
use colored::Colorize;
use disco_core::{EffectiveCatalog, Fetcher, fetch_directory};
use std::path::Path;

/// Execute the list command: print the effective catalog.
pub async fn execute(
    policy_path: Option<&Path>,
    index_url: &str,
    preferred_only: bool,
    verbose: bool,
) -> Result<()> {
    let policy = super::load_policy(policy_path)?;
    let fetcher = Fetcher::new()?;
    let raw = fetch_directory(&fetcher, index_url).await?;
    let catalog = EffectiveCatalog::build(raw, &policy);

    if catalog.is_empty() {
        println!("The effective catalog is empty.");
        return Ok(());
    }

    let mut shown = 0;
    for descriptor in catalog.entries() {
        if preferred_only && !descriptor.preferred {
            continue;
        }
        shown += 1;

        let mut markers = Vec::new();
        if descriptor.preferred {
            markers.push("preferred".to_string());
        }
        if policy.paused(&descriptor.key()) {
            markers.push("paused".yellow().to_string());
        }
        let suffix = if markers.is_empty() {
            String::new()
        } else {
            format!(" ({})", markers.join(", "))
        };

        println!("{}{suffix}", descriptor.id().green());
        if verbose {
            if !descriptor.description.is_empty() {
                println!("  {}", descriptor.description);
            }
            if !descriptor.discovery_rest_url.is_empty() {
                println!("  {}", descriptor.discovery_rest_url.bright_black());
            }
        }
    }

    println!();
    println!("{shown} of {} cataloged APIs shown", catalog.len());
    Ok(())
}
