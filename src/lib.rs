//! Lawsuit Tracker: retrieves the movements of a lawsuit from a public court portal
//!
//! The portal has no API. This crate drives its stateful form flow the way a
//! browser would: open a session, submit the search form, follow the result
//! link, then walk the paginated movement table using the server's view-state
//! token, collecting every movement in page order.

pub mod config;
pub mod crawler;
pub mod form;
pub mod html;
pub mod output;
pub mod session;
pub mod transport;

use thiserror::Error;

/// Main error type for lawsuit tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unexpected HTTP status {status} from {url}")]
    Transport { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Required element not found: {element}")]
    ElementNotFound { element: String },

    #[error("Failed to parse {element}: {value:?} is not a number")]
    Parse { element: String, value: String },

    #[error("Invalid locator {expr:?}: {message}")]
    InvalidLocator { expr: String, message: String },

    #[error("Result link pattern did not match {fragment:?}")]
    LinkPatternMismatch { fragment: String },

    #[error("No view-state token held by the session")]
    MissingViewState,

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        from: crawler::CrawlState,
        to: crawler::CrawlState,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

impl TrackerError {
    /// Shorthand for a missing markup element
    pub fn not_found(element: impl Into<String>) -> Self {
        Self::ElementNotFound {
            element: element.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid link pattern: {0}")]
    InvalidPattern(String),
}

/// The failure of a single lawsuit code's crawl
///
/// Carries the state the crawl was in when it moved to `Failed`, so callers
/// can tell a failed search from a failed page fetch.
#[derive(Debug, Error)]
#[error("crawl of {code} failed while {stage}: {source}")]
pub struct CrawlError {
    pub code: String,
    pub stage: crawler::CrawlState,
    #[source]
    pub source: TrackerError,
}

/// Result type alias for lawsuit tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, CrawlState, Crawler, SearchTarget};
pub use session::CrawlSession;
pub use transport::{HttpTransport, Transport};
