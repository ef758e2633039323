//! Configuration management infrastructure
//!
//! Layered logger settings using figment:
//! - Programmatic defaults
//! - `.logit/config.yaml` project file
//! - `LOGIT_*` environment variable overrides

pub mod loader;

pub use loader::SettingsLoader;
