//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// fp - Track git activity from your terminal.
#[derive(Debug, Parser)]
#[command(name = "fp")]
#[command(author, version = crate::updates::VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
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
    /// Update fp to the latest or a given release
    Update(UpdateArgs),

    /// Read and write configuration values
    Config(ConfigArgs),

    /// Show the running version
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Update(_) => "update",
            Commands::Config(_) => "config",
            Commands::Version => "version",
            Commands::Completions(_) => "completions",
        }
    }
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    /// Release to install (e.g. v1.2.0); latest when omitted
    // `version` is the id of the propagated `--version` flag.
    #[arg(id = "release", value_name = "VERSION")]
    pub version: Option<String>,

    /// Build VERSION from source instead of downloading a binary
    #[arg(long, requires = "release")]
    pub tag: bool,

    /// Only report whether an update is available
    #[arg(long, conflicts_with_all = ["release", "tag"])]
    pub check: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// `config` subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the value stored under KEY
    Get {
        /// Configuration key (e.g. update.notify)
        key: String,
    },

    /// Store VALUE under KEY
    Set {
        /// Configuration key (e.g. update.notify)
        key: String,
        /// Value to store
        value: String,
    },

    /// List all stored values
    List,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
