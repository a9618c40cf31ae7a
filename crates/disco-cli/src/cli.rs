//! # CLI Structure and Argument Parsing
//!
//! This module defines the command-line interface for `disco`, built with
//! `clap` derive macros for automatic help generation and argument
//! validation.
//!
//! ## Usage Patterns
//!
//! ```bash
//! # Regenerate every preferred API from the discovery index
//! disco generate ./generated --from-discovery --preferred-only
//!
//! # Regenerate two named APIs, then drop stale artifacts
//! disco generate ./generated --api books.v1 --api blogger.v3 --clean
//!
//! # Generate from a raw document URL or a local file
//! disco generate ./generated --url https://example.test/books/v1/rest
//! disco generate ./generated --file books-v1.json
//!
//! # Inspect the effective catalog (after the policy overlay)
//! disco list --verbose
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `disco` command.
///
/// Global options apply to every subcommand: `--verbose` raises logging to
/// DEBUG, `--quiet` suppresses informational output, `--policy` points at
/// the overlay file, and `--index-url` overrides the discovery index
/// location (mainly for tests and mirrors).
#[derive(Parser, Clone, Debug)]
#[command(name = "disco")]
#[command(version)]
#[command(about = "disco - keep generated API clients in sync with a discovery catalog", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show warnings and errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Path to the policy overlay file. Also via `DISCO_POLICY`.
    #[arg(long, global = true, value_name = "FILE", env = "DISCO_POLICY")]
    pub policy: Option<PathBuf>,

    /// Discovery index URL. Also via `DISCO_INDEX_URL`.
    #[arg(long, global = true, value_name = "URL", env = "DISCO_INDEX_URL")]
    pub index_url: Option<String>,
}

/// Available subcommands for the `disco` CLI.
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate client artifacts into a destination directory
    Generate {
        /// Destination directory for generated artifacts
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        /// Generate directly from raw description document URLs
        #[arg(long = "url", value_name = "URL")]
        urls: Vec<String>,

        /// Generate from local description document files
        #[arg(long = "file", value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Sweep the full effective catalog
        #[arg(long)]
        from_discovery: bool,

        /// With --from-discovery, skip APIs not marked preferred
        #[arg(long)]
        preferred_only: bool,

        /// Generate the named APIs (name.version); repeatable
        #[arg(long = "api", value_name = "NAME.VERSION")]
        apis: Vec<String>,

        /// Read additional name.version ids from a file, one per line
        #[arg(long, value_name = "FILE")]
        names: Option<PathBuf>,

        /// Write the effective catalog's ids to a file, one per line
        #[arg(long, value_name = "FILE")]
        names_out: Option<PathBuf>,

        /// Remove artifacts no longer present in the catalog
        #[arg(long)]
        clean: bool,
    },

    /// List the effective catalog
    List {
        /// Only show APIs marked preferred
        #[arg(long)]
        preferred_only: bool,
    },
}
