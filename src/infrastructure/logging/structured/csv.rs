use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use ::csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::{StructuredFormat, StructuredRecord};
use crate::domain::ports::RecordSink;

/// Appends one row per record, after a header row taken from the first record.
///
/// The field set must not change during the sink's lifetime; rows written
/// with a different field set are not reconciled with the header.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All rows in the file, header included
    pub fn rows(&self) -> LogitResult<Vec<StringRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| LogitError::io("open", &self.path, e.into()))?;

        reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LogitError::io("read", &self.path, e.into()))
    }

    fn has_rows(&self) -> LogitResult<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) if metadata.len() == 0 => Ok(false),
            Ok(_) => Ok(!self.rows()?.is_empty()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(LogitError::io("inspect", &self.path, e)),
        }
    }
}

impl RecordSink for CsvSink {
    fn format(&self) -> StructuredFormat {
        StructuredFormat::Csv
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, record: &StructuredRecord) -> LogitResult<()> {
        let write_header = !self.has_rows()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LogitError::io("open", &self.path, e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if write_header {
            writer
                .write_record(record.keys())
                .map_err(|e| LogitError::io("write header to", &self.path, e.into()))?;
        }
        writer
            .write_record(record.values())
            .map_err(|e| LogitError::io("append row to", &self.path, e.into()))?;
        writer
            .flush()
            .map_err(|e| LogitError::io("flush", &self.path, e))
    }
}
