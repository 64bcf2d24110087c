//! Pre-processing steps run once before pagination starts
//!
//! Boundary discovery is the built-in step: it requests page 1 and reads the
//! last page from the response body.

use super::types::BoundarySource;
use crate::aggregator::PageFetcher;
use crate::error::{Error, Result};
use crate::types::Page;
use async_trait::async_trait;
use tracing::{debug, info};

/// First page requested during boundary discovery
pub const DISCOVERY_PAGE: Page = 1;

/// State visible to pre-processing steps
pub struct Preflight<'a> {
    /// Fetcher configured with the run's transport, template, headers and timeout
    pub fetcher: &'a PageFetcher,
    /// Resolved boundary, if known
    pub boundary: Option<Page>,
}

/// A step executed once, in registration order, before the main loop
///
/// Any error aborts the run before a single page is requested.
#[async_trait]
pub trait PreProcessor: Send + Sync {
    /// Inspect or update the preflight state
    async fn accept(&self, preflight: &mut Preflight<'_>) -> Result<()>;
}

/// Discovers the boundary from the first page's response
pub struct BoundaryDiscovery {
    source: Box<dyn BoundarySource>,
}

impl BoundaryDiscovery {
    /// Create a discovery step reading the boundary through `source`
    pub fn new(source: Box<dyn BoundarySource>) -> Self {
        Self { source }
    }

    /// Request page 1 and extract the boundary
    ///
    /// Every failure is reported as [`Error::Boundary`] with the cause in its
    /// message: transport errors, statuses >= 400 and undecodable bodies.
    pub async fn resolve(&self, fetcher: &PageFetcher) -> Result<Page> {
        let url = fetcher.template().render(DISCOVERY_PAGE);
        debug!("Discovering boundary from {}", url);

        let response = fetcher
            .client()
            .get(&url, fetcher.headers(), fetcher.timeout())
            .await
            .map_err(|e| {
                Error::boundary(format!("request for page {DISCOVERY_PAGE} failed: {e}"))
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::boundary(format!(
                "page {DISCOVERY_PAGE} returned HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::boundary(format!("reading page {DISCOVERY_PAGE} body failed: {e}"))
        })?;
        let boundary = self.source.extract(&body).map_err(|e| match e {
            Error::Boundary { .. } => e,
            other => Error::boundary(format!("page {DISCOVERY_PAGE} body: {other}")),
        })?;

        info!("Resolved boundary: {}", boundary);
        Ok(boundary)
    }
}

impl std::fmt::Debug for BoundaryDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryDiscovery").finish_non_exhaustive()
    }
}

#[async_trait]
impl PreProcessor for BoundaryDiscovery {
    async fn accept(&self, preflight: &mut Preflight<'_>) -> Result<()> {
        let boundary = self.resolve(preflight.fetcher).await?;
        preflight.boundary = Some(boundary);
        Ok(())
    }
}
