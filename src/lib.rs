// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Pagination Aggregator
//!
//! Fetches every page of a paginated HTTP resource in bounded concurrent
//! batches, handing each completed batch to caller-supplied consumers.
//!
//! ## Features
//!
//! - **Bounded Concurrency**: Never more than `concurrency` requests in flight
//! - **Boundary Discovery**: Reads the last page from the first response
//! - **Pointer Overrides**: Offsets, strides or any custom pointer scheme
//! - **Failures as Data**: 4xx/5xx and network errors become interactions
//! - **Early Exit**: Consumers and cancellation stop the run between batches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagination_aggregator::{AggregatorConfig, HttpClient, Interaction, PaginationAggregator};
//!
//! #[tokio::main]
//! async fn main() -> pagination_aggregator::Result<()> {
//!     let config = AggregatorConfig::builder()
//!         .client(HttpClient::new()?)
//!         .url("https://api.example.com/items?page={page}")
//!         .boundary_field("meta.total_pages")
//!         .concurrency(5)
//!         .consumer(|batch: &[Interaction]| -> anyhow::Result<()> {
//!             println!("batch of {}", batch.len());
//!             Ok(())
//!         })
//!         .build();
//!
//!     let mut aggregator = PaginationAggregator::new(config)?;
//!     let interactions = aggregator.get().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  PaginationAggregator::get                │
//! │  pre-process → loop { pointer → launch → drain → deliver }│
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┴─┬──────────────┬────────────┐
//! │   Config   │     Boundary     │  Pagination  │    HTTP    │
//! ├────────────┼──────────────────┼──────────────┼────────────┤
//! │ Defaults   │ Shape decode     │ Offset       │ Headers    │
//! │ Validation │ Field path       │ Step         │ Timeouts   │
//! │ Job files  │ Pre-processors   │ Consumers    │ Classify   │
//! └────────────┴──────────────────┴──────────────┴────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Endpoint template handling
pub mod template;

/// Run-level cancellation
pub mod cancel;

/// HTTP transport
pub mod http;

/// Pointer overrides and batch consumers
pub mod pagination;

/// Boundary discovery and pre-processing
pub mod boundary;

/// Batch coordinator and page fetcher
pub mod aggregator;

/// Job file configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use aggregator::{AggregatorConfig, PaginationAggregator};
pub use boundary::BoundaryPage;
pub use cancel::CancelSignal;
pub use error::{Error, Result};
pub use http::HttpClient;
pub use pagination::{BatchConsumer, BatchContext, OffsetPointer, PointerOverride};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
