use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::{StructuredFormat, StructuredRecord};
use crate::domain::ports::RecordSink;

/// Keeps a JSON array of records, rewritten whole on every append
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    /// Sink writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Records currently in the file.
    ///
    /// An empty or unreadable document is replaced with `[]` and read as no
    /// records.
    pub fn records(&self) -> LogitResult<Vec<Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(LogitError::io("read", &self.path, e)),
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                if !raw.trim().is_empty() {
                    warn!(path = %self.path.display(), error = %e, "resetting corrupt JSON sink");
                }
                self.write(&[])?;
                Ok(Vec::new())
            }
        }
    }

    fn write(&self, records: &[Value]) -> LogitResult<()> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| LogitError::io("serialize records for", &self.path, e.into()))?;
        fs::write(&self.path, json).map_err(|e| LogitError::io("write", &self.path, e))
    }
}

impl RecordSink for JsonSink {
    fn format(&self) -> StructuredFormat {
        StructuredFormat::Json
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self, record: &StructuredRecord) -> LogitResult<()> {
        let mut records = self.records()?;
        records.push(record.to_json());
        self.write(&records)
    }
}
