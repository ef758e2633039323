//! Infrastructure layer module
//!
//! Filesystem-facing pieces of the logger:
//! - Project paths (hidden config and archive directories)
//! - Settings loading
//! - Rotation ledger and structured sinks

pub mod config;
pub mod logging;
pub mod paths;

pub use paths::ProjectPaths;
