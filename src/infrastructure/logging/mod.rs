//! Logging infrastructure
//!
//! File-level machinery behind the logger:
//! - Rotation ledger and archiving
//! - Structured JSON/XML/CSV sinks

pub mod rotation;
pub mod structured;

pub use rotation::{unix_now, RotationLedger};
pub use structured::{create_sink, sink_path, CsvSink, JsonSink, XmlSink};
