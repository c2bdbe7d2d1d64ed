use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::io::{self, Stdout, Write};

/// Prints every movement as an indented line
pub struct ConsoleOutput<W: Write = Stdout> {
    writer: W,
}

impl ConsoleOutput<Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl<W: Write> ConsoleOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for ConsoleOutput<W> {
    fn begin(&mut self, _code: &str) -> OutputResult<()> {
        Ok(())
    }

    fn write_record(&mut self, code: &str, record: &str) -> OutputResult<()> {
        writeln!(self.writer, "\t\t -> {}", record).map_err(|source| OutputError::Write {
            code: code.to_string(),
            source,
        })
    }

    fn finish(&mut self, _result: &crate::crawler::CrawlResult) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
