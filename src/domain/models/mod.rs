pub mod config;
pub mod format;
pub mod level;
pub mod record;
pub mod report;

pub use config::{ConfigDict, LoggerConfig, LoggerSettings};
pub use format::{CallSite, OutputFormat, ProduceFn, Producer, StructuredFormat};
pub use level::Level;
pub use record::{StructuredRecord, MESSAGE_FIELD};
pub use report::{DeliveryFailure, DeliveryTarget, LogReport};
