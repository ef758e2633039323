//! Logging pipeline built on the domain models.

pub mod formatter;
pub mod logger;

pub use formatter::{
    build_line, build_record, render, render_message, FormatContext, RenderedField, RenderedMessage,
};
pub use logger::Logger;
