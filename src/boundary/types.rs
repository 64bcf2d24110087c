//! Boundary extraction types
//!
//! A boundary source turns the body of the page-1 response into the last
//! valid page index.

use crate::error::{Error, Result};
use crate::types::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// A decodable response shape exposing the last page
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Listing {
///     total_pages: u64,
/// }
///
/// impl BoundaryPage for Listing {
///     fn boundary(&self) -> u64 {
///         self.total_pages
///     }
/// }
/// ```
pub trait BoundaryPage: DeserializeOwned {
    /// The last valid page (inclusive)
    fn boundary(&self) -> Page;
}

/// Extracts a boundary from a raw response body
pub trait BoundarySource: Send + Sync {
    /// Decode `body` and return the last valid page
    fn extract(&self, body: &[u8]) -> Result<Page>;
}

/// Decodes the body into a caller-provided [`BoundaryPage`] shape
pub struct ShapeBoundary<B> {
    _shape: PhantomData<fn() -> B>,
}

impl<B: BoundaryPage> ShapeBoundary<B> {
    /// Create a source for shape `B`
    pub fn new() -> Self {
        Self {
            _shape: PhantomData,
        }
    }
}

impl<B: BoundaryPage> Default for ShapeBoundary<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for ShapeBoundary<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeBoundary")
            .field("shape", &std::any::type_name::<B>())
            .finish()
    }
}

impl<B: BoundaryPage> BoundarySource for ShapeBoundary<B> {
    fn extract(&self, body: &[u8]) -> Result<Page> {
        let shape: B = serde_json::from_slice(body)?;
        Ok(shape.boundary())
    }
}

/// Reads the boundary from a dotted field path (e.g. `meta.total_pages`)
#[derive(Debug, Clone)]
pub struct FieldBoundary {
    /// Path to the field, optionally prefixed with `$.`
    pub path: String,
}

impl FieldBoundary {
    /// Create a field boundary source
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl BoundarySource for FieldBoundary {
    fn extract(&self, body: &[u8]) -> Result<Page> {
        let value: Value = serde_json::from_slice(body)?;
        let field = extract_path(&value, &self.path)
            .ok_or_else(|| Error::boundary(format!("field '{}' not found", self.path)))?;

        match field {
            Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| Error::boundary(format!("field '{}' is not a page number", self.path))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::boundary(format!("field '{}' is not a page number", self.path))),
            _ => Err(Error::boundary(format!(
                "field '{}' is not a page number",
                self.path
            ))),
        }
    }
}

/// Navigate a JSON value by dotted path
fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(current)
}
