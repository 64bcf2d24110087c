//! Endpoint template handling
//!
//! An endpoint template is a URL containing exactly one `{page}` placeholder,
//! e.g. `https://api.example.com/items?page={page}`. The placeholder is
//! replaced by the decimal page or offset value for each request.

use crate::error::{Error, Result};
use crate::types::Page;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Regex for matching the page placeholder: {page}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*page\s*\}").expect("placeholder regex is valid"));

/// A validated endpoint template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    raw: String,
}

impl EndpointTemplate {
    /// Parse and validate a template string
    pub fn parse(template: impl Into<String>) -> Result<Self> {
        let raw = template.into();

        if raw.trim().is_empty() {
            return Err(Error::missing_field("url"));
        }

        match placeholder_count(&raw) {
            1 => Ok(Self { raw }),
            0 => Err(Error::invalid_value(
                "url",
                format!("template '{raw}' has no {{page}} placeholder"),
            )),
            n => Err(Error::invalid_value(
                "url",
                format!("template '{raw}' has {n} {{page}} placeholders, expected exactly one"),
            )),
        }
    }

    /// Render the template for one page value
    pub fn render(&self, page: Page) -> String {
        PLACEHOLDER_REGEX
            .replace(&self.raw, page.to_string().as_str())
            .into_owned()
    }

    /// Render the template and parse the result as a URL
    pub fn render_url(&self, page: Page) -> Result<url::Url> {
        Ok(url::Url::parse(&self.render(page))?)
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Count page placeholders in a string
pub fn placeholder_count(s: &str) -> usize {
    PLACEHOLDER_REGEX.find_iter(s).count()
}
