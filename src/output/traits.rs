//! Output handler traits and types
//!
//! This module defines the trait interface for result sinks and their errors.

use crate::crawler::CrawlResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output for {code}: {source}")]
    Write {
        code: String,
        source: std::io::Error,
    },

    #[error("No lawsuit file open for {0}")]
    NotStarted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for sinks receiving crawled movements
///
/// For each lawsuit code the driver calls `begin` before the crawl starts,
/// then `write_record` once per movement in crawl order and `finish` when
/// the crawl completes. A failed crawl gets `begin` but no records.
pub trait OutputHandler {
    /// Prepares the sink for a lawsuit code
    fn begin(&mut self, code: &str) -> OutputResult<()>;

    /// Emits one movement
    fn write_record(&mut self, code: &str, record: &str) -> OutputResult<()>;

    /// Completes the lawsuit code
    fn finish(&mut self, _result: &CrawlResult) -> OutputResult<()> {
        Ok(())
    }

    /// Returns the handler name for logging
    fn name(&self) -> &'static str;
}
