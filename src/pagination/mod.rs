//! Pagination module
//!
//! Supports: sequential pages, offsets, stepped pointers, custom overrides
//!
//! # Overview
//!
//! The pagination module defines the strategy seams of the aggregator. A
//! [`PointerOverride`] decides which value each iteration fetches, and a
//! [`BatchConsumer`] receives each completed batch.

mod strategies;
mod types;

pub use strategies::{OffsetPointer, StepPointer};
pub use types::{BatchConsumer, BatchContext, PointerOverride};
