use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::LogitError;

/// Severity levels, least severe first.
///
/// The rank of a level is its position in this list. A logger configured
/// with a minimum level emits every message whose rank is at least the
/// minimum's rank.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Temporary clutter messages
    #[default]
    Clutter,
    /// Information related to the application
    Info,
    /// Debug messages
    Debug,
    /// Warnings
    Warning,
    /// An error occurred
    Error,
    /// The application cannot continue
    Critical,
}

impl Level {
    /// Every level in rank order
    pub const ALL: [Self; 6] = [
        Self::Clutter,
        Self::Info,
        Self::Debug,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// 0-based ordinal in declaration order
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Lowercase name, as used in configuration
    pub const fn value(self) -> &'static str {
        match self {
            Self::Clutter => "clutter",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Resolve a lowercase name to its level
    pub fn from_value(value: &str) -> Result<Self, LogitError> {
        Self::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or_else(|| LogitError::InvalidLevel(value.to_string()))
    }

    /// Whether a message at this level passes a logger whose minimum is `minimum`
    pub const fn passes(self, minimum: Self) -> bool {
        self.rank() >= minimum.rank()
    }
}

impl FromStr for Level {
    type Err = LogitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value().to_uppercase())
    }
}
