//! Multi-code driver
//!
//! Crawls lawsuit codes one after another, each with its own session, and
//! routes completed results to the output handlers. Whether a failed code
//! stops the run is decided here, not by the crawler.

use crate::config::FailurePolicy;
use crate::crawler::orchestrator::Crawler;
use crate::crawler::types::{CrawlResult, SearchTarget};
use crate::output::{self, OutputHandler};
use crate::transport::Transport;
use crate::{CrawlError, Result};

/// Outcome of a multi-code run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Completed crawls, in input order
    pub completed: Vec<CrawlResult>,
    /// Failed crawls, in input order
    pub failed: Vec<CrawlError>,
    /// Codes never attempted because an earlier one failed under `Abort`
    pub skipped: Vec<SearchTarget>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Crawls every target in order and emits each completed result
///
/// Output failures are fatal for the whole run; crawl failures follow `policy`.
pub async fn run_codes<T: Transport>(
    crawler: &Crawler<T>,
    targets: &[SearchTarget],
    outputs: &mut [Box<dyn OutputHandler>],
    policy: FailurePolicy,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, target) in targets.iter().enumerate() {
        for handler in outputs.iter_mut() {
            handler.begin(target.code())?;
        }

        match crawler.crawl(target).await {
            Ok(result) => {
                for handler in outputs.iter_mut() {
                    tracing::debug!(code = result.code(), handler = handler.name(), "Emitting");
                    output::emit(handler.as_mut(), &result)?;
                }
                summary.completed.push(result);
            }
            Err(failure) => {
                summary.failed.push(failure);
                if policy == FailurePolicy::Abort {
                    summary.skipped = targets[index + 1..].to_vec();
                    if !summary.skipped.is_empty() {
                        tracing::warn!(
                            skipped = summary.skipped.len(),
                            "Aborting run after failed crawl"
                        );
                    }
                    break;
                }
            }
        }
    }

    Ok(summary)
}
