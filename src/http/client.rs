//! HTTP client used for page and boundary requests
//!
//! Wraps a `reqwest::Client` with:
//! - Default headers applied to every request
//! - A user agent identifying the aggregator
//! - Per-request timeouts independent of any run-level cancellation

use crate::error::Result;
use crate::types::Headers;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Client-wide timeout, applied when a request sets none
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Default headers for all requests
    pub default_headers: Headers,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: Headers::new(),
            user_agent: format!("pagination-aggregator/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the client-wide timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP transport for the aggregator
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Merge default headers with request headers; request headers win
    pub fn effective_headers(&self, headers: &Headers) -> Headers {
        let mut merged = self.config.default_headers.clone();
        for (key, value) in headers {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Make a GET request with the given headers and timeout
    ///
    /// Any status code is returned as `Ok`; only build and transport failures
    /// are errors.
    pub async fn get(&self, url: &str, headers: &Headers, timeout: Duration) -> Result<Response> {
        let mut req = self.client.get(url).timeout(timeout);

        for (key, value) in self.effective_headers(headers) {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await?;
        debug!("GET {} -> {}", url, response.status().as_u16());
        Ok(response)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
