//! Tests for boundary extraction and discovery

use super::*;
use crate::aggregator::PageFetcher;
use crate::error::Error;
use crate::http::HttpClient;
use crate::template::EndpointTemplate;
use crate::types::{Headers, Page};
use serde::Deserialize;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Listing {
    count: u64,
}

impl BoundaryPage for Listing {
    fn boundary(&self) -> Page {
        self.count
    }
}

fn fetcher(server: &MockServer) -> PageFetcher {
    PageFetcher::new(
        HttpClient::new().unwrap(),
        EndpointTemplate::parse(format!("{}/list?page={{page}}", server.uri())).unwrap(),
        Headers::new(),
        Duration::from_secs(5),
    )
}

// ============================================================================
// Source Tests
// ============================================================================

#[test]
fn test_shape_boundary() {
    let source = ShapeBoundary::<Listing>::new();
    assert_eq!(source.extract(br#"{"count": 1302, "results": []}"#).unwrap(), 1302);
}

#[test]
fn test_shape_boundary_decode_error() {
    let source = ShapeBoundary::<Listing>::new();
    let err = source.extract(b"{\"total\": 3}").unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[test_case("total_pages", r#"{"total_pages": 9}"#, 9)]
#[test_case("$.meta.last", r#"{"meta": {"last": 4}}"#, 4)]
#[test_case("meta.last", r#"{"meta": {"last": "12"}}"#, 12)]
#[test_case("pages.1", r#"{"pages": [1, 7]}"#, 7)]
fn test_field_boundary(path: &str, body: &str, expected: Page) {
    let source = FieldBoundary::new(path);
    assert_eq!(source.extract(body.as_bytes()).unwrap(), expected);
}

#[test_case("missing", r#"{"total_pages": 9}"#)]
#[test_case("total_pages", r#"{"total_pages": -1}"#)]
#[test_case("total_pages", r#"{"total_pages": "many"}"#)]
#[test_case("total_pages", r#"{"total_pages": null}"#)]
fn test_field_boundary_rejects(path: &str, body: &str) {
    let err = FieldBoundary::new(path).extract(body.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Boundary { .. }));
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[tokio::test]
async fn test_discovery_requests_first_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let discovery = BoundaryDiscovery::new(Box::new(ShapeBoundary::<Listing>::new()));

    let mut preflight = Preflight {
        fetcher: &fetcher,
        boundary: None,
    };
    discovery.accept(&mut preflight).await.unwrap();

    assert_eq!(preflight.boundary, Some(42));
}

#[tokio::test]
async fn test_discovery_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let discovery = BoundaryDiscovery::new(Box::new(FieldBoundary::new("count")));

    let err = discovery.resolve(&fetcher).await.unwrap_err();
    match err {
        Error::Boundary { message } => {
            assert_eq!(message, "page 1 returned HTTP 500: oops");
        }
        other => panic!("expected Boundary, got {other:?}"),
    }
}

#[tokio::test]
async fn test_discovery_transport_error() {
    let fetcher = PageFetcher::new(
        HttpClient::new().unwrap(),
        EndpointTemplate::parse("http://127.0.0.1:1/list?page={page}").unwrap(),
        Headers::new(),
        Duration::from_secs(2),
    );
    let discovery = BoundaryDiscovery::new(Box::new(FieldBoundary::new("count")));

    let err = discovery.resolve(&fetcher).await.unwrap_err();
    match err {
        Error::Boundary { message } => assert!(message.starts_with("request for page 1 failed")),
        other => panic!("expected Boundary, got {other:?}"),
    }
}

#[tokio::test]
async fn test_discovery_undecodable_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let discovery = BoundaryDiscovery::new(Box::new(ShapeBoundary::<Listing>::new()));

    let err = discovery.resolve(&fetcher).await.unwrap_err();
    match err {
        Error::Boundary { message } => {
            assert!(message.starts_with("page 1 body: Failed to parse JSON"));
        }
        other => panic!("expected Boundary, got {other:?}"),
    }
}

#[tokio::test]
async fn test_discovery_keeps_field_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"total": 3})))
        .mount(&server)
        .await;

    let fetcher = fetcher(&server);
    let discovery = BoundaryDiscovery::new(Box::new(FieldBoundary::new("count")));

    let err = discovery.resolve(&fetcher).await.unwrap_err();
    assert!(matches!(err, Error::Boundary { .. }));
    assert!(!err.to_string().contains("page 1 body"));
}
