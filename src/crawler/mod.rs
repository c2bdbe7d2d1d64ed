//! Crawler module for lawsuit retrieval
//!
//! This module contains the core crawling logic, including:
//! - The per-code crawl state machine
//! - Search result link discovery
//! - Movement record extraction
//! - The sequential multi-code driver

mod driver;
mod link;
mod orchestrator;
mod records;
mod state;
mod types;

pub use driver::{run_codes, RunSummary};
pub use link::{find_result_links, resolve_link, LinkExtractor, OnclickPattern, RESULT_TABLE_ID};
pub use orchestrator::{Crawler, OpenedLawsuit, SEARCH_FORM_ID};
pub use records::{extract_records, MOVEMENTS_ID};
pub use state::CrawlState;
pub use types::{parse_codes, CrawlResult, MovementRecord, SearchTarget};

use crate::config::Config;
use crate::output::OutputHandler;
use crate::transport::HttpTransport;
use crate::Result;

/// Runs a complete retrieval over HTTP
///
/// This is the main entry point. It will:
/// 1. Build the HTTP transport from the configuration
/// 2. Crawl each lawsuit code in order with its own session
/// 3. Emit every completed code's movements to `outputs`
///
/// # Returns
///
/// * `Ok(RunSummary)` - Every code was attempted or skipped per the failure policy
/// * `Err(TrackerError)` - The transport could not be built or an output failed
pub async fn retrieve(
    config: &Config,
    targets: &[SearchTarget],
    outputs: &mut [Box<dyn OutputHandler>],
) -> Result<RunSummary> {
    let transport = HttpTransport::new(&config.http)?;
    let crawler = Crawler::from_config(transport, &config.portal)?;
    run_codes(&crawler, targets, outputs, config.run.on_failure).await
}
