//! Domain layer for logit
//!
//! Levels, configuration, output formats and the structured record, plus
//! the duration/size literal parsers they depend on.

pub mod error;
pub mod models;
pub mod ports;
pub mod units;

// Re-export error types for convenient access
pub use error::{LogitError, LogitResult};
