//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Waldo - upload mobile builds with their CI and git provenance.
#[derive(Debug, Parser)]
#[command(name = "waldo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .waldo/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override a setting (apiBuildEndpoint, apiErrorEndpoint,
    /// apiTriggerEndpoint, wrapperName, wrapperVersion)
    #[arg(long = "override", value_name = "KEY=VALUE", global = true)]
    pub overrides: Vec<String>,

    /// Show request and response details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
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
    /// Upload a build (.apk, .app or .ipa)
    Upload(UploadArgs),

    /// Trigger a run
    Trigger(TriggerArgs),

    /// Show detected CI and git information
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `upload` command.
#[derive(Debug, Clone, clap::Args)]
pub struct UploadArgs {
    /// Path to the build artifact
    pub build_path: PathBuf,

    /// Upload token
    #[arg(
        long,
        env = "WALDO_UPLOAD_TOKEN",
        hide_env_values = true,
        default_value = ""
    )]
    pub upload_token: String,

    /// Variant name reported with the build
    #[arg(long)]
    pub variant_name: Option<String>,

    /// Branch the build came from, reported alongside the detected one
    #[arg(long)]
    pub git_branch: Option<String>,

    /// Commit the build came from, reported alongside the detected one
    #[arg(long)]
    pub git_commit: Option<String>,
}

/// Arguments for the `trigger` command.
#[derive(Debug, Clone, clap::Args)]
pub struct TriggerArgs {
    /// Upload token
    #[arg(
        long,
        env = "WALDO_UPLOAD_TOKEN",
        hide_env_values = true,
        default_value = ""
    )]
    pub upload_token: String,

    /// Rule selecting which scenarios to run
    #[arg(long)]
    pub rule_name: Option<String>,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InfoArgs {
    /// Repository directory (defaults to the current directory)
    pub dir: Option<PathBuf>,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
