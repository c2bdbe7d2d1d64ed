use crate::crawler::CrawlResult;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one `<code>.txt` file per lawsuit, one movement per line
///
/// The file is truncated when the crawl starts, so a failed crawl leaves it empty.
pub struct FileOutput {
    directory: PathBuf,
    current: Option<(String, BufWriter<File>)>,
}

impl FileOutput {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            current: None,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file receiving `code`'s movements
    pub fn path_for(&self, code: &str) -> PathBuf {
        let file_name: String = code
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.directory.join(format!("{}.txt", file_name))
    }
}

impl OutputHandler for FileOutput {
    fn begin(&mut self, code: &str) -> OutputResult<()> {
        fs::create_dir_all(&self.directory)?;

        let path = self.path_for(code);
        let file = File::create(&path).map_err(|source| OutputError::Write {
            code: code.to_string(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "Lawsuit file truncated");
        self.current = Some((code.to_string(), BufWriter::new(file)));
        Ok(())
    }

    fn write_record(&mut self, code: &str, record: &str) -> OutputResult<()> {
        let writer = match &mut self.current {
            Some((current, writer)) if current.as_str() == code => writer,
            _ => return Err(OutputError::NotStarted(code.to_string())),
        };

        writeln!(writer, "{}", record).map_err(|source| OutputError::Write {
            code: code.to_string(),
            source,
        })
    }

    fn finish(&mut self, result: &CrawlResult) -> OutputResult<()> {
        if let Some((code, mut writer)) = self.current.take() {
            writer.flush().map_err(|source| OutputError::Write {
                code: code.clone(),
                source,
            })?;
            tracing::info!(
                code = %code,
                records = result.records().len(),
                path = %self.path_for(&code).display(),
                "Lawsuit saved"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::SearchTarget;
    use tempfile::TempDir;

    fn result(code: &str, records: &[&str]) -> CrawlResult {
        CrawlResult::new(
            SearchTarget::new(code),
            records.iter().map(|r| r.to_string()).collect(),
        )
    }

    #[test]
    fn test_writes_one_record_per_line() {
        let dir = TempDir::new().unwrap();
        let mut output = FileOutput::new(dir.path().join("save"));

        output.begin("0001").unwrap();
        output.write_record("0001", "Filed").unwrap();
        output.write_record("0001", "Served").unwrap();
        output.finish(&result("0001", &["Filed", "Served"])).unwrap();

        let content = fs::read_to_string(dir.path().join("save").join("0001.txt")).unwrap();
        assert_eq!(content, "Filed\nServed\n");
    }

    #[test]
    fn test_begin_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("0001.txt");
        fs::write(&path, "stale\n").unwrap();

        let mut output = FileOutput::new(dir.path());
        output.begin("0001").unwrap();
        output.finish(&result("0001", &[])).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_write_without_begin() {
        let dir = TempDir::new().unwrap();
        let mut output = FileOutput::new(dir.path());
        assert!(matches!(
            output.write_record("0001", "Filed"),
            Err(OutputError::NotStarted(_))
        ));
    }

    #[test]
    fn test_path_separators_replaced() {
        let output = FileOutput::new("/tmp/save");
        assert_eq!(
            output.path_for("12/34\\56"),
            PathBuf::from("/tmp/save/12_34_56.txt")
        );
    }
}
