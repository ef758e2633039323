//! Logit - leveled file logging with structured sinks and rotation
//!
//! A [`Logger`] filters messages by [`Level`], renders them with an
//! [`OutputFormat`], appends the line to a log file and mirrors the same
//! fields into optional JSON, XML or CSV files. Log files are archived when
//! they grow past a size threshold or when a time threshold has elapsed
//! since the last rotation recorded in the project's ledger.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): levels, configuration, records, error type
//! - **Infrastructure Layer** (`infrastructure`): ledger, sinks, settings loader
//! - **Service Layer** (`services`): formatter and logger
//! - **CLI Layer** (`cli`): archive maintenance binary
//!
//! # Example
//!
//! ```no_run
//! use logit::{Level, Logger, ProjectPaths, StructuredFormat};
//!
//! fn main() -> logit::LogitResult<()> {
//!     let mut logger = Logger::new(ProjectPaths::current()?);
//!     logger.configure_full(Level::Info, "logs/app.log", Some("1d"), Some("10mb"))?;
//!     logger.register_sink(StructuredFormat::Json)?;
//!
//!     logger.info("service started")?;
//!     logger.clutter("not written, below info")?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    CallSite, ConfigDict, DeliveryFailure, DeliveryTarget, Level, LogReport, LoggerConfig,
    LoggerSettings, OutputFormat, Producer, StructuredFormat, StructuredRecord,
};
pub use domain::ports::RecordSink;
pub use domain::units::{parse_duration, parse_size};
pub use domain::{LogitError, LogitResult};
pub use infrastructure::config::SettingsLoader;
pub use infrastructure::logging::{CsvSink, JsonSink, RotationLedger, XmlSink};
pub use infrastructure::paths::ProjectPaths;
pub use services::Logger;
