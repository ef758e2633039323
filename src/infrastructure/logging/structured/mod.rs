//! Structured sinks written alongside the primary log
//!
//! Each sink owns `structured-{log stem}.{ext}` in the log file's directory
//! and rewrites or appends to it once per message.

pub mod csv;
pub mod json;
pub mod xml;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::StructuredFormat;
use crate::domain::ports::RecordSink;

pub use self::csv::CsvSink;
pub use self::json::JsonSink;
pub use self::xml::XmlSink;

/// File a sink of `format` writes for the primary log `log_file`
pub fn sink_path(log_file: &Path, format: StructuredFormat) -> PathBuf {
    let stem = log_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("structured-{stem}.{}", format.extension());

    match log_file.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Create the sink for `format` next to `log_file`, creating its file if needed
pub fn create_sink(format: StructuredFormat, log_file: &Path) -> LogitResult<Box<dyn RecordSink>> {
    let path = sink_path(log_file, format);
    touch(&path)?;

    let sink: Box<dyn RecordSink> = match format {
        StructuredFormat::Json => Box::new(JsonSink::new(path)),
        StructuredFormat::Xml => Box::new(XmlSink::new(path)),
        StructuredFormat::Csv => Box::new(CsvSink::new(path)),
    };
    Ok(sink)
}

/// Create `path` and its parent directories without truncating an existing file
pub(crate) fn touch(path: &Path) -> LogitResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| LogitError::io("create directory", parent, e))?;
        }
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|e| LogitError::io("create", path, e))
}
