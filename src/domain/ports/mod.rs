//! Port trait definitions
//!
//! - RecordSink: structured output written alongside the primary log

pub mod record_sink;

pub use record_sink::RecordSink;
