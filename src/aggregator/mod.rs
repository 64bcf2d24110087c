//! Batch aggregation engine
//!
//! Fetches every page of a paginated resource in bounded concurrent batches.
//!
//! # Overview
//!
//! The aggregator module provides:
//! - `PaginationAggregator` - the batch coordinator
//! - `AggregatorConfig` - configuration and its builder
//! - `PageFetcher` - single-page fetch and outcome classification
//!
//! # Run lifecycle
//!
//! 1. Pre-processing steps run once (boundary discovery when needed)
//! 2. The pointer walks from `start` to the boundary, optionally rewritten by
//!    a pointer override before each fetch
//! 3. Fetches are spawned until the batch holds `concurrency` requests or the
//!    pointer reaches the boundary
//! 4. The batch is drained from a `JoinSet` in completion order, appended to
//!    the result and handed to every consumer, followed by the inter-batch
//!    delay unless it was the last batch
//! 5. Cancellation is checked once per iteration

mod config;
mod fetcher;

pub use config::{
    AggregatorConfig, AggregatorConfigBuilder, NormalizedConfig, DEFAULT_CONCURRENCY,
    DEFAULT_DELAY, DEFAULT_START, DEFAULT_TIMEOUT,
};
pub use fetcher::PageFetcher;

use crate::boundary::Preflight;
use crate::cancel::CancelSignal;
use crate::error::{Error, Result};
use crate::pagination::{BatchConsumer, BatchContext, PointerOverride};
use crate::types::{sort_by_page, Interaction, Page, Request, Response};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{Id, JoinSet};
use tracing::{debug, info, warn};

/// Fetches all pages of a paginated HTTP resource in concurrent batches
///
/// One aggregator drives one run at a time; [`get`](Self::get) takes
/// `&mut self` and keeps all per-run state local.
pub struct PaginationAggregator {
    fetcher: Arc<PageFetcher>,
    start: Page,
    boundary: Option<Page>,
    concurrency: usize,
    delay: Duration,
    consumers: Vec<Box<dyn BatchConsumer>>,
    pointer: Option<Box<dyn PointerOverride>>,
    pre_processors: Vec<Box<dyn crate::boundary::PreProcessor>>,
    cancel: CancelSignal,
    ordered: bool,
}

/// Mutable state of a single run
struct RunState {
    boundary: Page,
    in_flight: JoinSet<Interaction>,
    /// Page of each in-flight task, for reporting tasks that fail to join
    pages: HashMap<Id, Page>,
    results: Vec<Interaction>,
    batches: usize,
}

impl RunState {
    fn new(boundary: Page) -> Self {
        Self {
            boundary,
            in_flight: JoinSet::new(),
            pages: HashMap::new(),
            results: Vec::new(),
            batches: 0,
        }
    }

    /// Detach in-flight fetches; they finish on their own timeout
    fn abandon(&mut self) {
        if !self.in_flight.is_empty() {
            debug!("Abandoning {} in-flight fetches", self.in_flight.len());
        }
        self.in_flight.detach_all();
        self.pages.clear();
    }
}

impl PaginationAggregator {
    /// Create an aggregator, validating and normalizing `config`
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        Ok(Self::from_normalized(config.normalize()?))
    }

    /// Create an aggregator from an already normalized config
    pub fn from_normalized(config: NormalizedConfig) -> Self {
        Self {
            fetcher: Arc::new(config.fetcher),
            start: config.start,
            boundary: config.boundary,
            concurrency: config.concurrency,
            delay: config.delay,
            consumers: config.consumers,
            pointer: config.pointer,
            pre_processors: config.pre_processors,
            cancel: config.cancel,
            ordered: config.ordered,
        }
    }

    /// Page fetcher used by this aggregator
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// First page
    pub fn start(&self) -> Page {
        self.start
    }

    /// Configured boundary; `None` means it is discovered on each run
    pub fn boundary(&self) -> Option<Page> {
        self.boundary
    }

    /// Requests per batch
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Delay between batches
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fetch every page and return all interactions
    ///
    /// Batches are appended in submission order; within a batch the order is
    /// completion order unless ordering was requested. Per-page failures are
    /// returned as error-bearing interactions. A consumer error or
    /// cancellation stops the run and returns [`Error::ConsumerAborted`] or
    /// [`Error::Cancelled`], both carrying the interactions delivered so far.
    pub async fn get(&mut self) -> Result<Vec<Interaction>> {
        let started = Instant::now();
        let boundary = self.run_pre_processors().await?;
        let mut run = RunState::new(boundary);

        info!(
            url = %self.fetcher.template(),
            start = self.start,
            boundary,
            concurrency = self.concurrency,
            "Starting aggregation"
        );

        let mut page = self.start;
        while page <= boundary {
            let mut current = page;
            if let Some(pointer) = &self.pointer {
                pointer.apply(&mut current, boundary);
            }

            self.launch(&mut run, current);

            if run.in_flight.len() >= self.concurrency || current == boundary {
                let last = current == boundary;
                self.drain(&mut run, last).await?;
            }

            if current > boundary {
                debug!(pointer = current, boundary, "Pointer passed boundary");
                break;
            }

            if self.cancel.is_cancelled() {
                run.abandon();
                warn!("Aggregation cancelled after {} batches", run.batches);
                return Err(Error::Cancelled {
                    partial: run.results,
                });
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        if !run.in_flight.is_empty() {
            self.drain(&mut run, true).await?;
        }

        info!(
            interactions = run.results.len(),
            batches = run.batches,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Aggregation complete"
        );

        Ok(run.results)
    }

    /// Run pre-processing steps and return the resolved boundary
    async fn run_pre_processors(&self) -> Result<Page> {
        let mut preflight = Preflight {
            fetcher: &self.fetcher,
            boundary: self.boundary,
        };

        for step in &self.pre_processors {
            step.accept(&mut preflight).await?;
        }

        preflight
            .boundary
            .ok_or_else(|| Error::boundary("no pre-processing step resolved a boundary"))
    }

    /// Spawn a fetch for `page` unless it lies past the boundary
    fn launch(&self, run: &mut RunState, page: Page) {
        if page > run.boundary {
            debug!(page, boundary = run.boundary, "Skipping page past boundary");
            return;
        }

        let fetcher = Arc::clone(&self.fetcher);
        let handle = run.in_flight.spawn(async move { fetcher.fetch(page).await });
        run.pages.insert(handle.id(), page);
    }

    /// Wait for the in-flight batch, record it and hand it to the consumers
    async fn drain(&mut self, run: &mut RunState, last: bool) -> Result<()> {
        let mut batch = Vec::with_capacity(run.in_flight.len());
        while let Some(joined) = run.in_flight.join_next().await {
            match joined {
                Ok(interaction) => batch.push(interaction),
                Err(e) => {
                    let Some(page) = run.pages.get(&e.id()).copied() else {
                        warn!(error = %e, "Untracked fetch task failed");
                        continue;
                    };
                    warn!(page, error = %e, "Fetch task failed");
                    batch.push(Interaction {
                        request: Request::get(page, self.fetcher.template().render(page)),
                        response: Response::transport_failure(format!("fetch task failed: {e}")),
                    });
                }
            }
        }
        run.pages.clear();

        if batch.is_empty() {
            return Ok(());
        }

        if self.ordered {
            sort_by_page(&mut batch);
        }

        run.batches += 1;
        let offset = run.results.len();
        run.results.extend(batch);

        let ctx = BatchContext {
            number: run.batches,
            boundary: run.boundary,
            cancel: self.cancel.clone(),
        };
        let delivered = &run.results[offset..];
        info!(
            batch = ctx.number,
            size = delivered.len(),
            errors = delivered.iter().filter(|i| i.is_error()).count(),
            "Batch complete"
        );

        for consumer in &mut self.consumers {
            if let Err(source) = consumer.consume(&run.results[offset..], &ctx).await {
                warn!(batch = ctx.number, error = %source, "Batch consumer stopped the run");
                return Err(Error::ConsumerAborted {
                    batch: ctx.number,
                    partial: std::mem::take(&mut run.results),
                    source,
                });
            }
        }

        if !last && !self.delay.is_zero() {
            debug!("Waiting {:?} before next batch", self.delay);
            tokio::time::sleep(self.delay).await;
        }

        Ok(())
    }
}

impl std::fmt::Debug for PaginationAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationAggregator")
            .field("fetcher", &self.fetcher)
            .field("start", &self.start)
            .field("boundary", &self.boundary)
            .field("concurrency", &self.concurrency)
            .field("delay", &self.delay)
            .field("consumers", &self.consumers.len())
            .field("has_pointer", &self.pointer.is_some())
            .field("pre_processors", &self.pre_processors.len())
            .field("ordered", &self.ordered)
            .finish()
    }
}
