//! CLI module
//!
//! Command-line interface for running aggregation jobs.
//!
//! # Commands
//!
//! - `fetch` - Fetch every page and print each interaction
//! - `validate` - Check a job file without network activity

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::{merge_job, parse_header, Runner};
