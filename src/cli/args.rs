//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Outfitter - host-side install detection for integration recipes.
#[derive(Debug, Parser)]
#[command(name = "outfitter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing recipe definition files
    #[arg(short, long, global = true, env = "OUTFITTER_RECIPES", default_value = "recipes")]
    pub recipes_dir: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect which recipes are installable on this host (default)
    Detect(DetectArgs),

    /// Validate the recipe catalog without running detection
    Validate,

    /// List recipes and their detection criteria
    List,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `detect` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DetectArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Seconds a discovery script may run before being killed
    #[arg(long, default_value_t = 60)]
    pub script_timeout: u64,

    /// Pack catalog to match against the detected recipes
    #[arg(long)]
    pub packs: Option<PathBuf>,

    /// Detect only the named recipes and their dependencies (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

// Derived Default would zero the timeout; keep it in sync with the
// clap default instead.
impl Default for DetectArgs {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            script_timeout: 60,
            packs: None,
            only: Vec::new(),
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format for detection results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
