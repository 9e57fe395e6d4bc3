//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "UVFile";

/// uvfile - keep `uv tool` installs in sync with a UVFile.
#[derive(Debug, Parser)]
#[command(name = "uvfile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the UVFile
    #[arg(long, global = true, env = "UVFILE_PATH", default_value = DEFAULT_MANIFEST)]
    pub uvfile: PathBuf,

    /// uv executable to run
    #[arg(long, global = true, env = "UVFILE_UV", default_value = "uv")]
    pub uv: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a UVFile from the currently installed tools
    Init(InitArgs),

    /// Install, reinstall or remove tools to match the UVFile
    Sync(SyncArgs),

    /// Print a bash wrapper that keeps the UVFile updated
    Env,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing UVFile without asking
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SyncArgs {
    /// Reinstall tools even when they already match
    #[arg(long)]
    pub reinstall: bool,

    /// Uninstall tools that are not in the UVFile
    #[arg(long)]
    pub uninstall: bool,

    /// Both --reinstall and --uninstall
    #[arg(long)]
    pub strict: bool,

    /// Print the uv commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
