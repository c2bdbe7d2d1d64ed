//! Output module for emitting crawled movements
//!
//! This module handles:
//! - Printing movements to standard output
//! - Saving each lawsuit's movements to its own text file

mod console;
mod file;
mod traits;

pub use console::ConsoleOutput;
pub use file::FileOutput;
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::crawler::CrawlResult;

/// Emits a completed crawl's movements to one handler, in crawl order
pub fn emit(handler: &mut dyn OutputHandler, result: &CrawlResult) -> OutputResult<()> {
    for record in result.records() {
        handler.write_record(result.code(), record)?;
    }
    handler.finish(result)
}
