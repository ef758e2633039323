use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors raised by the logger, its configuration and its sinks
#[derive(Error, Debug)]
pub enum LogitError {
    #[error("Invalid level: '{0}'. Must be one of: clutter, info, debug, warning, error, critical")]
    InvalidLevel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("'{input}' is not a valid {kind} literal: {reason}")]
    Parse {
        kind: &'static str,
        input: String,
        reason: String,
    },

    #[error("Structured format not supported: '{0}'. Must be one of: json, xml, csv")]
    FormatNotSupported(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl LogitError {
    /// Wrap an I/O error with a message naming the operation and path
    pub fn io(action: &str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            context: format!("failed to {action} {}", path.display()),
            source,
        }
    }

    pub(crate) fn parse(kind: &'static str, input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate
pub type LogitResult<T> = Result<T, LogitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_carries_path_context() {
        let err = LogitError::io(
            "open",
            Path::new("/tmp/app.log"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to open /tmp/app.log: denied");
    }

    #[test]
    fn test_parse_error_message() {
        let err = LogitError::parse("duration", "5x", "unknown unit 'x'");
        assert_eq!(
            err.to_string(),
            "'5x' is not a valid duration literal: unknown unit 'x'"
        );
    }
}
