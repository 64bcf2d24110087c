//! Pagination types and traits
//!
//! Defines the caller-supplied strategies the coordinator calls into: pointer
//! overrides and batch consumers.

use crate::cancel::CancelSignal;
use crate::types::{Interaction, Page};
use async_trait::async_trait;

/// Rewrites the pointer before each fetch
///
/// Called once per loop iteration with the current pointer and the resolved
/// boundary. The override may skip, jump or stall; the rewritten value is the
/// one substituted into the endpoint template.
pub trait PointerOverride: Send + Sync {
    /// Rewrite `current` in place
    fn apply(&self, current: &mut Page, boundary: Page);
}

impl<F> PointerOverride for F
where
    F: Fn(&mut Page, Page) + Send + Sync,
{
    fn apply(&self, current: &mut Page, boundary: Page) {
        self(current, boundary);
    }
}

/// Context handed to a [`BatchConsumer`] with each batch
#[derive(Debug, Clone)]
pub struct BatchContext {
    /// 1-based batch number
    pub number: usize,
    /// Resolved last page (inclusive)
    pub boundary: Page,
    /// Run-level cancellation signal
    pub cancel: CancelSignal,
}

/// Receives each completed batch
///
/// Returning an error stops the run; the aggregator then returns the
/// interactions accumulated so far together with that error.
#[async_trait]
pub trait BatchConsumer: Send {
    /// Consume one batch, in completion order unless ordering was requested
    async fn consume(&mut self, batch: &[Interaction], ctx: &BatchContext) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> BatchConsumer for F
where
    F: FnMut(&[Interaction]) -> anyhow::Result<()> + Send,
{
    async fn consume(&mut self, batch: &[Interaction], _ctx: &BatchContext) -> anyhow::Result<()> {
        self(batch)
    }
}
