//! Search result link discovery
//!
//! The portal does not put the lawsuit URL in an `href`: each result row's
//! anchor opens it from an inline `onclick` script. Pulling the URL out of
//! that script is the most fragile step of the crawl, so it sits behind the
//! [`LinkExtractor`] trait and can be replaced without touching the crawler.

use crate::config::DEFAULT_LINK_PATTERN;
use crate::html::{self, Document, Locator};
use crate::{ConfigError, Result, TrackerError};
use regex::Regex;
use url::Url;

/// Id of the search result table
pub const RESULT_TABLE_ID: &str = "fPP:processosTable";

/// Pulls a lawsuit link out of a row's script fragment
pub trait LinkExtractor: Send + Sync {
    /// Returns the link, or `LinkPatternMismatch` when the fragment holds none
    fn extract(&self, fragment: &str) -> Result<String>;
}

/// Extracts the first capture group of a regex applied to the `onclick` script
#[derive(Debug, Clone)]
pub struct OnclickPattern {
    pattern: Regex,
}

impl OnclickPattern {
    pub fn new(pattern: &str) -> std::result::Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
        Ok(Self { pattern })
    }
}

impl Default for OnclickPattern {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_LINK_PATTERN).expect("default link pattern compiles"),
        }
    }
}

impl LinkExtractor for OnclickPattern {
    fn extract(&self, fragment: &str) -> Result<String> {
        self.pattern
            .captures(fragment)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| TrackerError::LinkPatternMismatch {
                fragment: fragment.to_string(),
            })
    }
}

/// Collects the lawsuit links of every matching row of the result table
///
/// Rows whose first anchor has no script, or whose script does not match,
/// are not candidates. A missing table means the search matched nothing.
pub fn find_result_links(doc: &Document, extractor: &dyn LinkExtractor) -> Result<Vec<String>> {
    let table = Locator::id(RESULT_TABLE_ID)?;
    let rows = Locator::tag("tr")?;
    let anchor = Locator::tag("a")?;

    let mut links = Vec::new();
    for row in html::find_all(doc, &table, &rows) {
        let Some(onclick) =
            html::find_first_within(row, &anchor).and_then(|a| html::attr(a, "onclick"))
        else {
            continue;
        };

        match extractor.extract(onclick) {
            Ok(link) => links.push(link),
            Err(e) => tracing::debug!("Skipping result row: {}", e),
        }
    }

    Ok(links)
}

/// Resolves a link found in the portal's markup against the portal base URL
///
/// Absolute paths replace the base path; absolute URLs are kept as they are.
pub fn resolve_link(base_url: &Url, href: &str) -> Result<Url> {
    Ok(base_url.join(href.trim())?)
}
