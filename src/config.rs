//! Job file configuration
//!
//! A job file describes one aggregation run in YAML (or JSON, which YAML
//! accepts). It maps onto [`AggregatorConfig`] through
//! [`JobConfig::into_aggregator_config`].
//!
//! ```yaml
//! url: https://api.example.com/items?page={page}
//! headers:
//!   Accept: application/json
//! boundary_field: meta.total_pages
//! concurrency: 5
//! delay_secs: 1
//! ```

use crate::aggregator::AggregatorConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::OffsetPointer;
use crate::template::EndpointTemplate;
use crate::types::{Headers, Page};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// One aggregation run loaded from a job file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Endpoint template with one `{page}` placeholder
    pub url: String,

    /// Headers applied to every request
    #[serde(default)]
    pub headers: Headers,

    /// First page or offset
    #[serde(default)]
    pub start: Option<Page>,

    /// Last page (inclusive)
    #[serde(default)]
    pub boundary: Option<Page>,

    /// Dotted JSON path to the last page in the page-1 response
    #[serde(default)]
    pub boundary_field: Option<String>,

    /// Requests per batch
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Delay between batches in seconds
    #[serde(default)]
    pub delay_secs: Option<u64>,

    /// Treat the pointer as an offset with this page size
    #[serde(default)]
    pub offset_page_size: Option<u64>,

    /// Sort each batch by page
    #[serde(default)]
    pub ordered: bool,
}

impl JobConfig {
    /// Parse a job from YAML or JSON text
    pub fn parse(content: &str) -> Result<Self> {
        let job: Self = serde_yaml::from_str(content)?;
        job.validate()?;
        Ok(job)
    }

    /// Check the job without touching the network
    pub fn validate(&self) -> Result<()> {
        EndpointTemplate::parse(self.url.as_str())?;

        let has_boundary = self.boundary.is_some_and(|b| b > 0);
        let has_field = self
            .boundary_field
            .as_deref()
            .is_some_and(|f| !f.trim().is_empty());

        if !has_boundary && !has_field {
            return Err(Error::config(
                "job needs either 'boundary' or 'boundary_field'",
            ));
        }

        if self.offset_page_size == Some(0) {
            return Err(Error::invalid_value(
                "offset_page_size",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Build an aggregator config using `client` as transport
    ///
    /// Consumers and cancellation are left for the caller to attach.
    pub fn into_aggregator_config(self, client: HttpClient) -> AggregatorConfig {
        let mut builder = AggregatorConfig::builder()
            .client(client)
            .url(self.url)
            .headers(self.headers)
            .ordered(self.ordered);

        if let Some(start) = self.start {
            builder = builder.start(start);
        }
        if let Some(boundary) = self.boundary {
            builder = builder.boundary(boundary);
        }
        if let Some(field) = self.boundary_field {
            builder = builder.boundary_field(field);
        }
        if let Some(concurrency) = self.concurrency {
            builder = builder.concurrency(concurrency);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.delay_secs {
            builder = builder.delay(Duration::from_secs(secs));
        }
        if let Some(page_size) = self.offset_page_size {
            builder = builder.pointer(OffsetPointer::new(page_size));
        }

        builder.build()
    }
}

/// Load a job file from disk
pub fn load_job(path: impl AsRef<Path>) -> Result<JobConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    JobConfig::parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_yaml_job() {
        let job = JobConfig::parse(
            r"
url: https://api.example.com/items?page={page}
headers:
  Accept: application/json
boundary_field: meta.total_pages
concurrency: 5
timeout_secs: 10
delay_secs: 1
ordered: true
",
        )
        .unwrap();

        assert_eq!(job.url, "https://api.example.com/items?page={page}");
        assert_eq!(
            job.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(job.boundary_field.as_deref(), Some("meta.total_pages"));
        assert_eq!(job.concurrency, Some(5));
        assert_eq!(job.timeout_secs, Some(10));
        assert_eq!(job.delay_secs, Some(1));
        assert!(job.ordered);
        assert_eq!(job.boundary, None);
    }

    #[test]
    fn test_parse_json_job() {
        let job = JobConfig::parse(
            r#"{"url": "http://localhost/x?offset={page}", "boundary": 100, "offset_page_size": 20}"#,
        )
        .unwrap();
        assert_eq!(job.boundary, Some(100));
        assert_eq!(job.offset_page_size, Some(20));
    }

    #[test]
    fn test_job_requires_boundary_or_field() {
        let err = JobConfig::parse("url: http://localhost/?page={page}").unwrap_err();
        assert!(err.to_string().contains("boundary"));
    }

    #[test]
    fn test_job_rejects_bad_template() {
        let err = JobConfig::parse("url: http://localhost/\nboundary: 3").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_job_rejects_zero_page_size() {
        let err = JobConfig::parse(
            "url: http://localhost/?offset={page}\nboundary: 3\noffset_page_size: 0",
        )
        .unwrap_err();
        assert!(err.to_string().contains("offset_page_size"));
    }

    #[test]
    fn test_job_rejects_unknown_fields() {
        let err = JobConfig::parse("url: http://localhost/?p={page}\nboundary: 3\nretries: 4")
            .unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_into_aggregator_config() {
        let job = JobConfig {
            url: "http://localhost/?offset={page}".to_string(),
            boundary: Some(50),
            concurrency: Some(4),
            timeout_secs: Some(7),
            delay_secs: Some(0),
            offset_page_size: Some(10),
            ..Default::default()
        };

        let config = job.into_aggregator_config(HttpClient::new().unwrap());
        assert_eq!(config.boundary, Some(50));
        assert_eq!(config.concurrency, Some(4));
        assert_eq!(config.timeout, Some(Duration::from_secs(7)));
        assert_eq!(config.delay, Some(Duration::ZERO));
        assert!(config.pointer.is_some());
        assert!(config.boundary_source.is_none());
    }

    #[test]
    fn test_load_job_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url: http://localhost/?page={{page}}").unwrap();
        writeln!(file, "boundary: 2").unwrap();

        let job = load_job(file.path()).unwrap();
        assert_eq!(job.boundary, Some(2));
    }

    #[test]
    fn test_load_job_missing_file() {
        let err = load_job("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
