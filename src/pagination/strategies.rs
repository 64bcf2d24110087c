//! Pointer override implementations
//!
//! Each strategy maps the sequential loop pointer onto the value an API
//! expects.

use super::types::PointerOverride;
use crate::types::Page;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., `?offset=20&limit=10`)
///
/// Maps page `n` to offset `(n - 1) * page_size`, so the loop walks
/// `0, page_size, 2 * page_size, ...` and stops once the offset passes the
/// boundary (usually a total record count).
#[derive(Debug, Clone, Copy)]
pub struct OffsetPointer {
    /// Number of records per page
    pub page_size: u64,
}

impl OffsetPointer {
    /// Create a new offset pointer
    pub fn new(page_size: u64) -> Self {
        Self { page_size }
    }
}

impl PointerOverride for OffsetPointer {
    fn apply(&self, current: &mut Page, _boundary: Page) {
        *current = current.saturating_sub(1).saturating_mul(self.page_size);
    }
}

// ============================================================================
// Stepped Pagination
// ============================================================================

/// Walks from `start` in fixed strides (e.g., every other page)
#[derive(Debug, Clone, Copy)]
pub struct StepPointer {
    /// First pointer value
    pub start: Page,
    /// Distance between consecutive pointers
    pub step: u64,
}

impl StepPointer {
    /// Create a new stepped pointer
    pub fn new(start: Page, step: u64) -> Self {
        Self { start, step }
    }
}

impl PointerOverride for StepPointer {
    fn apply(&self, current: &mut Page, _boundary: Page) {
        let index = current.saturating_sub(self.start);
        *current = self
            .start
            .saturating_add(index.saturating_mul(self.step.max(1)));
    }
}
