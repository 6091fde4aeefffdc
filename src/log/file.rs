use super::{CompletionLog, CompletionLogRecord, LogResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// CSV-file-backed completion log. Each append opens the file, writes one row
/// and closes it; the header row goes in only when the file is new or empty.
pub struct CsvCompletionLog {
    path: PathBuf,
}

impl CsvCompletionLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompletionLog for CsvCompletionLog {
    fn append(&self, record: &CompletionLogRecord) -> LogResult<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|meta| meta.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}
