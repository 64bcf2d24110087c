//! Aggregator configuration and normalization
//!
//! [`AggregatorConfig`] is what callers fill in; [`AggregatorConfig::normalize`]
//! validates it, fills defaults and registers boundary discovery when no
//! boundary was given.

use super::fetcher::PageFetcher;
use crate::boundary::{
    BoundaryDiscovery, BoundaryPage, BoundarySource, FieldBoundary, PreProcessor, ShapeBoundary,
};
use crate::cancel::CancelSignal;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{BatchConsumer, PointerOverride};
use crate::template::EndpointTemplate;
use crate::types::{Headers, Page};
use std::time::Duration;

/// Default number of concurrent requests per batch
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default delay between batches
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Default first page
pub const DEFAULT_START: Page = 1;

/// Caller-supplied aggregator configuration
///
/// Unset optional fields take their defaults during normalization. A start
/// page, boundary or concurrency of `0` counts as unset.
#[derive(Default)]
pub struct AggregatorConfig {
    /// HTTP transport (required)
    pub client: Option<HttpClient>,
    /// Endpoint template with one `{page}` placeholder (required)
    pub url: String,
    /// Headers applied to every request
    pub headers: Headers,
    /// First page or offset
    pub start: Option<Page>,
    /// Last page (inclusive); discovered from page 1 when unset
    pub boundary: Option<Page>,
    /// Requests per batch
    pub concurrency: Option<usize>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
    /// Delay between batches
    pub delay: Option<Duration>,
    /// Consumers invoked with every completed batch, in order
    pub consumers: Vec<Box<dyn BatchConsumer>>,
    /// Rewrites the pointer every iteration
    pub pointer: Option<Box<dyn PointerOverride>>,
    /// Reads the boundary from the page-1 response
    pub boundary_source: Option<Box<dyn BoundarySource>>,
    /// Extra steps run after boundary discovery
    pub pre_processors: Vec<Box<dyn PreProcessor>>,
    /// Run-level cancellation
    pub cancel: Option<CancelSignal>,
    /// Sort each batch by page before delivery
    pub ordered: bool,
}

impl AggregatorConfig {
    /// Create a new config builder
    pub fn builder() -> AggregatorConfigBuilder {
        AggregatorConfigBuilder::default()
    }

    /// Validate, fill defaults and register pre-processing steps
    pub fn normalize(self) -> Result<NormalizedConfig> {
        let template = EndpointTemplate::parse(self.url)?;
        let client = self.client.ok_or_else(|| Error::missing_field("client"))?;

        let boundary = self.boundary.filter(|b| *b > 0);
        let mut pre_processors = Vec::with_capacity(self.pre_processors.len() + 1);

        if boundary.is_none() {
            let source = self.boundary_source.ok_or_else(|| {
                Error::config("no boundary given and no boundary shape to discover it from")
            })?;
            pre_processors.push(Box::new(BoundaryDiscovery::new(source)) as Box<dyn PreProcessor>);
        }
        pre_processors.extend(self.pre_processors);

        let timeout = self
            .timeout
            .filter(|t| !t.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(NormalizedConfig {
            fetcher: PageFetcher::new(client, template, self.headers, timeout),
            start: self.start.filter(|s| *s > 0).unwrap_or(DEFAULT_START),
            boundary,
            concurrency: self
                .concurrency
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CONCURRENCY),
            delay: self.delay.unwrap_or(DEFAULT_DELAY),
            consumers: self.consumers,
            pointer: self.pointer,
            pre_processors,
            cancel: self.cancel.unwrap_or_default(),
            ordered: self.ordered,
        })
    }
}

impl std::fmt::Debug for AggregatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatorConfig")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("start", &self.start)
            .field("boundary", &self.boundary)
            .field("concurrency", &self.concurrency)
            .field("timeout", &self.timeout)
            .field("delay", &self.delay)
            .field("consumers", &self.consumers.len())
            .field("has_client", &self.client.is_some())
            .field("has_pointer", &self.pointer.is_some())
            .field("has_boundary_source", &self.boundary_source.is_some())
            .field("ordered", &self.ordered)
            .finish_non_exhaustive()
    }
}

/// Configuration after validation and defaulting
pub struct NormalizedConfig {
    pub fetcher: PageFetcher,
    pub start: Page,
    /// `None` until a pre-processor resolves it
    pub boundary: Option<Page>,
    pub concurrency: usize,
    pub delay: Duration,
    pub consumers: Vec<Box<dyn BatchConsumer>>,
    pub pointer: Option<Box<dyn PointerOverride>>,
    pub pre_processors: Vec<Box<dyn PreProcessor>>,
    pub cancel: CancelSignal,
    pub ordered: bool,
}

/// Builder for aggregator config
#[derive(Default)]
pub struct AggregatorConfigBuilder {
    config: AggregatorConfig,
}

impl AggregatorConfigBuilder {
    /// Set the HTTP transport
    pub fn client(mut self, client: HttpClient) -> Self {
        self.config.client = Some(client);
        self
    }

    /// Set the endpoint template
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Replace all headers
    pub fn headers(mut self, headers: Headers) -> Self {
        self.config.headers = headers;
        self
    }

    /// Set the first page
    pub fn start(mut self, start: Page) -> Self {
        self.config.start = Some(start);
        self
    }

    /// Set the last page, skipping boundary discovery
    pub fn boundary(mut self, boundary: Page) -> Self {
        self.config.boundary = Some(boundary);
        self
    }

    /// Set requests per batch
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = Some(concurrency);
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the delay between batches
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = Some(delay);
        self
    }

    /// Register a batch consumer
    pub fn consumer(mut self, consumer: impl BatchConsumer + 'static) -> Self {
        self.config.consumers.push(Box::new(consumer));
        self
    }

    /// Set the pointer override
    pub fn pointer(mut self, pointer: impl PointerOverride + 'static) -> Self {
        self.config.pointer = Some(Box::new(pointer));
        self
    }

    /// Discover the boundary by decoding page 1 into shape `B`
    pub fn boundary_shape<B: BoundaryPage + 'static>(mut self) -> Self {
        self.config.boundary_source = Some(Box::new(ShapeBoundary::<B>::new()));
        self
    }

    /// Discover the boundary from a dotted JSON field of page 1
    pub fn boundary_field(mut self, path: impl Into<String>) -> Self {
        self.config.boundary_source = Some(Box::new(FieldBoundary::new(path)));
        self
    }

    /// Discover the boundary with a custom source
    pub fn boundary_source(mut self, source: impl BoundarySource + 'static) -> Self {
        self.config.boundary_source = Some(Box::new(source));
        self
    }

    /// Register an extra pre-processing step
    pub fn pre_processor(mut self, step: impl PreProcessor + 'static) -> Self {
        self.config.pre_processors.push(Box::new(step));
        self
    }

    /// Set the run-level cancellation signal
    pub fn cancel(mut self, cancel: CancelSignal) -> Self {
        self.config.cancel = Some(cancel);
        self
    }

    /// Sort each batch by page before delivery
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.config.ordered = ordered;
        self
    }

    /// Build the config
    pub fn build(self) -> AggregatorConfig {
        self.config
    }
}
