//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concurrent paginated HTTP fetcher
#[derive(Parser, Debug)]
#[command(name = "pagination-aggregator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Job file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub job: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and print the interactions
    Fetch(FetchArgs),

    /// Validate a job file without making requests
    Validate,
}

/// Inline job settings; each overrides the job file
#[derive(clap::Args, Debug, Default)]
pub struct FetchArgs {
    /// Endpoint template with one {page} placeholder
    #[arg(long)]
    pub url: Option<String>,

    /// Request header as `Name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// First page or offset
    #[arg(long)]
    pub start: Option<u64>,

    /// Last page (inclusive)
    #[arg(long)]
    pub boundary: Option<u64>,

    /// Dotted JSON path to the last page in the page-1 response
    #[arg(long)]
    pub boundary_field: Option<String>,

    /// Requests per batch
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Delay between batches in seconds
    #[arg(long)]
    pub delay: Option<u64>,

    /// Treat the pointer as an offset with this page size
    #[arg(long)]
    pub offset_page_size: Option<u64>,

    /// Sort each batch by page
    #[arg(long)]
    pub ordered: bool,

    /// Abort the run after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one interaction per line)
    Json,
    /// Human-readable output
    Pretty,
}
