//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Runs IndoUI playground snippets and prints their render trees.
#[derive(Debug, Parser)]
#[command(name = "indo-playground")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Snippet files or directories to run
    #[arg(default_value = ".")]
    pub paths: Vec<Utf8PathBuf>,

    /// Read a single snippet from stdin instead of files
    #[arg(long, conflicts_with = "watch")]
    pub stdin: bool,

    /// Path to indo-playground.json
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Fail on malformed attributes instead of skipping them
    #[arg(long = "strict-attributes")]
    pub strict_attributes: bool,

    /// Maximum element nesting depth
    #[arg(long = "max-depth")]
    pub max_depth: Option<usize>,

    /// Extra component names to register (repeatable)
    #[arg(long = "component")]
    pub components: Vec<String>,

    /// Do not register the built-in IndoUI components
    #[arg(long = "no-builtins")]
    pub no_builtins: bool,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Re-run snippets when they change
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserveWatchOutput")]
    pub preserve_watch_output: bool,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable outline of each render tree (default)
    #[default]
    Human,
    /// Human-readable with source excerpts for errors
    HumanVerbose,
    /// JSON array with one entry per snippet
    Json,
    /// Machine-readable (one line per snippet)
    Machine,
    /// The render tree written back out as markup
    Markup,
}
