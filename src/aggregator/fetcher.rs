//! Page fetcher
//!
//! Issues one GET per page and classifies the outcome into an
//! [`Interaction`]. Fetching never fails: every failure becomes an
//! error-bearing interaction.

use crate::http::HttpClient;
use crate::template::EndpointTemplate;
use crate::types::{reason_phrase, Headers, Interaction, Page, Request, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Fetches single pages for one aggregator
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: HttpClient,
    template: EndpointTemplate,
    headers: Headers,
    timeout: Duration,
}

impl PageFetcher {
    /// Create a new page fetcher
    pub fn new(
        client: HttpClient,
        template: EndpointTemplate,
        headers: Headers,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            template,
            headers,
            timeout,
        }
    }

    /// Transport used for requests
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Endpoint template
    pub fn template(&self) -> &EndpointTemplate {
        &self.template
    }

    /// Headers applied to every request
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch one page
    ///
    /// Outcomes:
    /// - build or transport failure: status 500, error set, empty body
    /// - status 400..=599: actual status, error from the body (or the reason
    ///   phrase when the body is empty), empty body
    /// - body read failure: status 500 with the original reason phrase
    /// - otherwise: actual status and body
    pub async fn fetch(&self, page: Page) -> Interaction {
        let url = self.template.render(page);
        let request = Request::get(page, url.clone())
            .with_headers(self.client.effective_headers(&self.headers));

        if let Err(e) = self.template.render_url(page) {
            warn!(page, error = %e, "Failed to build request");
            return Interaction {
                request,
                response: Response::transport_failure(e.to_string()),
            };
        }

        let response = match self.client.get(&url, &self.headers, self.timeout).await {
            Ok(response) => classify(response).await,
            Err(e) => Response::transport_failure(e.to_string()),
        };

        match &response.error {
            Some(error) => warn!(page, status = response.status, %error, "Page fetch failed"),
            None => debug!(page, status = response.status, "Page fetched"),
        }

        Interaction { request, response }
    }
}

/// Classify an HTTP response into a normalized [`Response`]
async fn classify(response: reqwest::Response) -> Response {
    let status = response.status().as_u16();

    if (400..=599).contains(&status) {
        let body = response.text().await.unwrap_or_default();
        let error = if body.is_empty() {
            fallback_reason(status)
        } else {
            body
        };
        return Response::failure(status, error);
    }

    match response.text().await {
        Ok(body) => Response::success(status, body),
        Err(e) => Response::body_read_failure(status, e.to_string()),
    }
}

/// Reason phrase, or a generic description for non-standard codes
fn fallback_reason(status: u16) -> String {
    match reason_phrase(status) {
        "" => format!("HTTP {status}"),
        phrase => phrase.to_string(),
    }
}
