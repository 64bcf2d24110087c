//! Error types for the pagination aggregator
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-page HTTP failures are not errors at this level: they are recorded on
//! the page's [`Interaction`] and delivered like any other result. Only
//! configuration, boundary discovery, consumer and cancellation failures abort
//! a run.

use crate::types::Interaction;
use thiserror::Error;

/// The main error type for the pagination aggregator
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Boundary Errors
    // ============================================================================
    #[error("Boundary discovery failed: {message}")]
    Boundary { message: String },

    // ============================================================================
    // Run Aborts
    // ============================================================================
    #[error("Batch consumer aborted the run at batch {batch}: {source}")]
    ConsumerAborted {
        batch: usize,
        partial: Vec<Interaction>,
        #[source]
        source: anyhow::Error,
    },

    #[error("Run cancelled after {} interactions", partial.len())]
    Cancelled { partial: Vec<Interaction> },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a boundary discovery error
    pub fn boundary(message: impl Into<String>) -> Self {
        Self::Boundary {
            message: message.into(),
        }
    }

    /// Interactions delivered before the run was aborted
    pub fn partial_results(&self) -> &[Interaction] {
        match self {
            Error::ConsumerAborted { partial, .. } | Error::Cancelled { partial } => partial,
            _ => &[],
        }
    }

    /// Take ownership of the interactions delivered before the abort
    pub fn into_partial(self) -> Vec<Interaction> {
        match self {
            Error::ConsumerAborted { partial, .. } | Error::Cancelled { partial } => partial,
            _ => Vec::new(),
        }
    }
}

/// Result type alias for the pagination aggregator
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Request, Response};

    fn interaction(page: u64) -> Interaction {
        Interaction {
            request: Request::get(page, format!("http://localhost/items?page={page}")),
            response: Response::success(200, "{}"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("url");
        assert_eq!(err.to_string(), "Missing required config field: url");

        let err = Error::boundary("page 1 returned HTTP 404: Not found");
        assert_eq!(
            err.to_string(),
            "Boundary discovery failed: page 1 returned HTTP 404: Not found"
        );

        let err = Error::Cancelled {
            partial: vec![interaction(1), interaction(2)],
        };
        assert_eq!(err.to_string(), "Run cancelled after 2 interactions");
    }

    #[test]
    fn test_partial_results() {
        let err = Error::ConsumerAborted {
            batch: 1,
            partial: vec![interaction(1)],
            source: anyhow::anyhow!("stop"),
        };
        assert_eq!(err.partial_results().len(), 1);
        assert_eq!(err.into_partial()[0].page(), 1);

        let err = Error::config("bad");
        assert!(err.partial_results().is_empty());
        assert!(err.into_partial().is_empty());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
