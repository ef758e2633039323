use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::error::LogitError;

/// Closure behind a [`Producer::Custom`]
pub type ProduceFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Something that renders one field around the message body
#[derive(Clone)]
pub enum Producer {
    /// Local wall-clock time, `HH:MM:SS`
    Timestamp,
    /// The message's level, `[LEVEL]`
    Level,
    /// Source location of the logging call, `file:line`
    Location,
    /// A caller-supplied field
    Custom {
        /// Field name used in structured records
        name: String,
        /// Produces the field value on every message
        produce: ProduceFn,
    },
}

impl Producer {
    /// Build a custom producer from a closure
    pub fn custom<F>(name: impl Into<String>, produce: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Custom {
            name: name.into(),
            produce: Arc::new(produce),
        }
    }

    /// Field name this producer contributes to a structured record
    pub fn field_name(&self) -> &str {
        match self {
            Self::Timestamp => "time",
            Self::Level => "level",
            Self::Location => "location",
            Self::Custom { name, .. } => name,
        }
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp => f.write_str("Timestamp"),
            Self::Level => f.write_str("Level"),
            Self::Location => f.write_str("Location"),
            Self::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish(),
        }
    }
}

/// Producers rendered before and after the message body
#[derive(Debug, Clone)]
pub struct OutputFormat {
    /// Rendered in order before the message
    pub prefix: Vec<Producer>,
    /// Rendered in order after the message
    pub suffix: Vec<Producer>,
}

impl OutputFormat {
    /// A format with no producers: the line is the bare message
    pub const fn bare() -> Self {
        Self {
            prefix: Vec::new(),
            suffix: Vec::new(),
        }
    }

    /// Add a prefix producer
    #[must_use]
    pub fn with_prefix(mut self, producer: Producer) -> Self {
        self.prefix.push(producer);
        self
    }

    /// Add a suffix producer
    #[must_use]
    pub fn with_suffix(mut self, producer: Producer) -> Self {
        self.suffix.push(producer);
        self
    }
}

/// `time | [LEVEL] | file:line | message`
impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            prefix: vec![Producer::Timestamp, Producer::Level, Producer::Location],
            suffix: Vec::new(),
        }
    }
}

/// Where a logging call was made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source file as reported by the compiler
    pub file: &'static str,
    /// 1-based line number
    pub line: u32,
}

impl CallSite {
    /// Location of the caller of the current `#[track_caller]` chain
    #[track_caller]
    pub fn caller() -> Self {
        Location::caller().into()
    }

    /// Base name of the source file
    pub fn file_name(&self) -> &str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_name(), self.line)
    }
}

/// File formats a structured sink can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredFormat {
    /// A JSON array of objects
    Json,
    /// `<data>` root with one `<log>` element per message
    Xml,
    /// Header row followed by one row per message
    Csv,
}

impl StructuredFormat {
    /// File extension of the sink file
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for StructuredFormat {
    type Err = LogitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "csv" => Ok(Self::Csv),
            _ => Err(LogitError::FormatNotSupported(s.to_string())),
        }
    }
}

impl fmt::Display for StructuredFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
