//! Boundary module
//!
//! Resolves the last valid page when the caller does not supply one.
//!
//! # Overview
//!
//! - [`BoundaryPage`] - a decodable response shape with a boundary accessor
//! - [`BoundarySource`] - extracts a boundary from a raw body
//! - [`PreProcessor`] - extension point for steps run before pagination
//! - [`BoundaryDiscovery`] - the built-in pre-processor

mod resolver;
mod types;

pub use resolver::{BoundaryDiscovery, PreProcessor, Preflight, DISCOVERY_PAGE};
pub use types::{BoundaryPage, BoundarySource, FieldBoundary, ShapeBoundary};

#[cfg(test)]
mod tests;
