//! Common types used throughout the pagination aggregator
//!
//! This module contains the interaction record produced for every page fetch,
//! shared type aliases, and small helpers over interaction sequences.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// Header name to header value, applied identically to every request
pub type Headers = HashMap<String, String>;

/// A page number or offset substituted into the endpoint template
pub type Page = u64;

// ============================================================================
// Interaction
// ============================================================================

/// The request half of an [`Interaction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Page or offset value this request was built for
    pub page: Page,
    /// HTTP method (always `GET` for page fetches)
    pub method: String,
    /// Rendered URL
    pub url: String,
    /// Headers applied to the request
    #[serde(default)]
    pub headers: Headers,
}

impl Request {
    /// Create a GET request record without headers
    pub fn get(page: Page, url: impl Into<String>) -> Self {
        Self {
            page,
            method: "GET".to_string(),
            url: url.into(),
            headers: Headers::new(),
        }
    }

    /// Attach the headers that were applied
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Look up an applied header, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The response half of an [`Interaction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code (500 for transport failures)
    pub status: u16,
    /// Canonical reason phrase
    pub status_text: String,
    /// Failure description, if the fetch did not succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response body; empty for every failure
    #[serde(default)]
    pub data: String,
}

impl Response {
    /// A successful response carrying a body
    pub fn success(status: u16, data: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            error: None,
            data: data.into(),
        }
    }

    /// An error response with the given status and failure description
    pub fn failure(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            status_text: reason_phrase(status).to_string(),
            error: Some(error.into()),
            data: String::new(),
        }
    }

    /// A transport or request-build failure, reported as HTTP 500
    pub fn transport_failure(error: impl Into<String>) -> Self {
        Self::failure(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), error)
    }

    /// The body of a successful response could not be read
    ///
    /// Reported as HTTP 500 but keeps the original status's reason phrase.
    pub fn body_read_failure(original_status: u16, error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            status_text: reason_phrase(original_status).to_string(),
            error: Some(error.into()),
            data: String::new(),
        }
    }
}

/// Paired request/response record produced for one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub request: Request,
    pub response: Response,
}

impl Interaction {
    /// Page or offset value this interaction was fetched for
    pub fn page(&self) -> Page {
        self.request.page
    }

    /// Check if the fetch produced a body without error
    pub fn is_success(&self) -> bool {
        self.response.error.is_none()
    }

    /// Check if the fetch failed
    pub fn is_error(&self) -> bool {
        self.response.error.is_some()
    }

    /// Response body, present only on success
    pub fn data(&self) -> Option<&str> {
        if self.is_success() {
            Some(&self.response.data)
        } else {
            None
        }
    }

    /// Decode the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_str(&self.response.data)?)
    }
}

/// Sort interactions by their recorded page, restoring request order
pub fn sort_by_page(interactions: &mut [Interaction]) {
    interactions.sort_by_key(Interaction::page);
}

/// Canonical reason phrase for a status code, empty when unknown
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(200, "OK")]
    #[test_case(404, "Not Found")]
    #[test_case(408, "Request Timeout")]
    #[test_case(500, "Internal Server Error")]
    #[test_case(799, "")]
    fn test_reason_phrase(status: u16, expected: &str) {
        assert_eq!(reason_phrase(status), expected);
    }

    #[test]
    fn test_transport_failure_is_500() {
        let response = Response::transport_failure("connection refused");
        assert_eq!(response.status, 500);
        assert_eq!(response.status_text, "Internal Server Error");
        assert_eq!(response.error.as_deref(), Some("connection refused"));
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_request_header_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        let request = Request::get(3, "http://localhost/items?page=3").with_headers(headers);

        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("x-missing"), None);
        assert_eq!(request.method, "GET");
    }

    #[test]
    fn test_sort_by_page() {
        let mut items: Vec<Interaction> = [3, 1, 2]
            .into_iter()
            .map(|page| Interaction {
                request: Request::get(page, format!("http://localhost/{page}")),
                response: Response::success(200, ""),
            })
            .collect();

        sort_by_page(&mut items);
        let pages: Vec<Page> = items.iter().map(Interaction::page).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_interaction_json_and_data() {
        let ok = Interaction {
            request: Request::get(1, "http://localhost/1"),
            response: Response::success(200, r#"{"total_pages": 4}"#),
        };
        let value: serde_json::Value = ok.json().unwrap();
        assert_eq!(value["total_pages"], 4);
        assert!(ok.data().is_some());

        let failed = Interaction {
            request: Request::get(2, "http://localhost/2"),
            response: Response::failure(408, "Request Timeout"),
        };
        assert!(failed.is_error());
        assert_eq!(failed.data(), None);
    }
}
