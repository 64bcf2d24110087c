//! HTTP client module
//!
//! Provides the transport the aggregator fetches pages through.
//!
//! # Features
//!
//! - **Default Headers**: Applied to every request, overridable per request
//! - **Per-Request Timeouts**: Each fetch runs on its own clock

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
