//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::MatcherKind;

/// Top-level CLI parser for `taskalign`.
#[derive(Debug, Parser)]
#[command(
    name = "taskalign",
    version,
    about = "Check a task against blueprint, codebase, roadmap and requirements"
)]
pub struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a task description and print an alignment report.
    ///
    /// Exit status: 0 aligned, 1 conflicts, 2 missing information, 3 error.
    Check(CheckArgs),
    /// Print the canonical name each given name resolves to.
    Resolve {
        /// Names to resolve.
        #[arg(required = true)]
        names: Vec<String>,
        /// Alias table (YAML).
        #[arg(long, value_name = "FILE")]
        aliases: Option<PathBuf>,
        /// Config file (defaults to ./taskalign.yaml if present).
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Arguments for `taskalign check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Task description to check.
    pub task: String,

    /// Directory containing the context bundles.
    #[arg(long, value_name = "DIR")]
    pub bundles: Option<PathBuf>,

    /// Alias table (YAML).
    #[arg(long, value_name = "FILE")]
    pub aliases: Option<PathBuf>,

    /// Config file (defaults to ./taskalign.yaml if present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Comma-separated checks: blueprint, codebase, roadmap, requirements, coherence, all.
    #[arg(long, value_name = "LIST")]
    pub checks: Option<String>,

    /// Matcher used for fuzzy lookups.
    #[arg(long, value_enum)]
    pub matcher: Option<MatcherKind>,

    /// Minimum similarity score for the semantic matcher.
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f32>,

    /// Print JSON instead of Markdown.
    #[arg(long)]
    pub json: bool,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}
