use std::path::PathBuf;

use crate::domain::error::LogitError;
use crate::domain::models::format::StructuredFormat;

/// Part of the pipeline that failed while the primary write went ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// A structured sink
    Sink(StructuredFormat),
    /// The rotation check or archive move
    Rotation,
}

/// An isolated failure reported by a logging call
#[derive(Debug)]
pub struct DeliveryFailure {
    /// What failed
    pub target: DeliveryTarget,
    /// Why it failed
    pub error: LogitError,
}

/// Outcome of one logging call
#[derive(Debug, Default)]
pub struct LogReport {
    /// The message passed the level filter and was written
    pub emitted: bool,
    /// Archive the primary file was moved to before writing, if it rotated
    pub archived_to: Option<PathBuf>,
    /// Sink and rotation failures; none of them stopped the primary write
    pub failures: Vec<DeliveryFailure>,
}

impl LogReport {
    /// Report for a message dropped by the level filter
    pub fn suppressed() -> Self {
        Self::default()
    }

    /// Whether the primary file was rotated
    pub const fn rotated(&self) -> bool {
        self.archived_to.is_some()
    }

    /// Whether every part of the pipeline succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure reported for `target`, if any
    pub fn failure(&self, target: DeliveryTarget) -> Option<&LogitError> {
        self.failures
            .iter()
            .find(|failure| failure.target == target)
            .map(|failure| &failure.error)
    }
}
