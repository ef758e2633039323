use std::path::Path;

use crate::domain::error::LogitResult;
use crate::domain::models::{StructuredFormat, StructuredRecord};

/// Destination that receives one structured record per logged message
///
/// Implementations own a single file in a single format. They are driven
/// synchronously from the logging call, so `append` performs its I/O before
/// returning.
pub trait RecordSink: Send {
    /// Format this sink writes
    fn format(&self) -> StructuredFormat;

    /// File this sink writes to
    fn path(&self) -> &Path;

    /// Append one record to the sink file
    fn append(&mut self, record: &StructuredRecord) -> LogitResult<()>;
}
