//! Line and record rendering.
//!
//! A line is `p1 | p2 | message | s1 | s2`: prefix producers, the message,
//! then suffix producers, joined by `" | "`. Everything a producer needs
//! (level, call site, time) arrives in a [`FormatContext`].
//!
//! Decoration colors the level by severity, dims the timestamp and shows the
//! location in cyan. Custom producers are never decorated.
//!
//! Producers run once per message through [`render_message`]; the plain
//! line, the decorated line and the structured record are all built from
//! that single rendering.

use chrono::{DateTime, Local};
use console::Style;

use crate::domain::models::{
    CallSite, Level, OutputFormat, Producer, StructuredRecord, MESSAGE_FIELD,
};

const SEPARATOR: &str = " | ";

/// Per-message inputs of the producers
#[derive(Debug, Clone, Copy)]
pub struct FormatContext {
    /// Level of the message being logged
    pub level: Level,
    /// Where the logging call was made
    pub call_site: CallSite,
    /// When the message was logged
    pub now: DateTime<Local>,
}

impl FormatContext {
    /// Context stamped with the current local time
    pub fn new(level: Level, call_site: CallSite) -> Self {
        Self {
            level,
            call_site,
            now: Local::now(),
        }
    }
}

/// One producer's output, rendered once per message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    /// Field name used in structured records
    pub name: String,
    /// Text written to the log file and the sinks
    pub plain: String,
    /// Text printed to the terminal
    pub styled: String,
}

/// Every field of one message, ready to become a line or a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    prefix: Vec<RenderedField>,
    message: String,
    suffix: Vec<RenderedField>,
}

impl RenderedMessage {
    /// The text line, `p1 | p2 | message | s1 | s2`
    pub fn line(&self, decorate: bool) -> String {
        let pick = |field: &RenderedField| {
            if decorate {
                field.styled.clone()
            } else {
                field.plain.clone()
            }
        };

        self.prefix
            .iter()
            .map(pick)
            .chain(std::iter::once(self.message.clone()))
            .chain(self.suffix.iter().map(pick))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    /// The structured record: prefix fields, then `msg`, then suffix fields
    pub fn record(&self) -> StructuredRecord {
        let mut record = StructuredRecord::new();
        for field in &self.prefix {
            record.insert(field.name.as_str(), field.plain.as_str());
        }
        record.insert(MESSAGE_FIELD, self.message.as_str());
        for field in &self.suffix {
            record.insert(field.name.as_str(), field.plain.as_str());
        }
        record
    }
}

/// Render one producer, calling a custom closure exactly once
pub fn render(producer: &Producer, ctx: &FormatContext) -> RenderedField {
    let plain = match producer {
        Producer::Timestamp => ctx.now.format("%H:%M:%S").to_string(),
        Producer::Level => format!("[{}]", ctx.level),
        Producer::Location => ctx.call_site.to_string(),
        Producer::Custom { produce, .. } => produce(),
    };

    let styled = match producer {
        Producer::Timestamp => Some(Style::new().dim()),
        Producer::Level => Some(level_style(ctx.level)),
        Producer::Location => Some(Style::new().cyan()),
        Producer::Custom { .. } => None,
    }
    .map_or_else(
        || plain.clone(),
        |style| style.force_styling(true).apply_to(&plain).to_string(),
    );

    RenderedField {
        name: producer.field_name().to_string(),
        plain,
        styled,
    }
}

/// Render every producer of `format` around `message`
pub fn render_message(
    format: &OutputFormat,
    message: &str,
    ctx: &FormatContext,
) -> RenderedMessage {
    RenderedMessage {
        prefix: format.prefix.iter().map(|p| render(p, ctx)).collect(),
        message: message.to_string(),
        suffix: format.suffix.iter().map(|p| render(p, ctx)).collect(),
    }
}

/// Build the text line for `message`
pub fn build_line(
    format: &OutputFormat,
    message: &str,
    ctx: &FormatContext,
    decorate: bool,
) -> String {
    render_message(format, message, ctx).line(decorate)
}

/// Build the structured record for `message` from plain producer output
pub fn build_record(
    format: &OutputFormat,
    message: &str,
    ctx: &FormatContext,
) -> StructuredRecord {
    render_message(format, message, ctx).record()
}

/// Terminal style for a level, from dim clutter to bold red critical
fn level_style(level: Level) -> Style {
    match level {
        Level::Clutter => Style::new().dim(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().blue(),
        Level::Warning => Style::new().yellow(),
        Level::Error => Style::new().red(),
        Level::Critical => Style::new().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ctx(level: Level) -> FormatContext {
        FormatContext {
            level,
            call_site: CallSite {
                file: "src/bin/server.rs",
                line: 42,
            },
            now: Local.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap(),
        }
    }

    #[test]
    fn test_default_line_layout() {
        let line = build_line(&OutputFormat::default(), "hello", &ctx(Level::Info), false);
        assert_eq!(line, "09:05:07 | [INFO] | server.rs:42 | hello");
    }

    #[test]
    fn test_bare_format_is_just_the_message() {
        let line = build_line(&OutputFormat::bare(), "hello", &ctx(Level::Info), false);
        assert_eq!(line, "hello");
    }

    #[test]
    fn test_custom_producers_in_order() {
        let format = OutputFormat::bare()
            .with_prefix(Producer::custom("app", || "api".to_string()))
            .with_prefix(Producer::Level)
            .with_suffix(Producer::custom("pid", || "7".to_string()));

        let line = build_line(&format, "started", &ctx(Level::Warning), false);
        assert_eq!(line, "api | [WARNING] | started | 7");
    }

    #[test]
    fn test_decorated_line_strips_to_plain() {
        let format = OutputFormat::default();
        let context = ctx(Level::Critical);

        let decorated = build_line(&format, "boom", &context, true);
        let plain = build_line(&format, "boom", &context, false);

        assert_ne!(decorated, plain);
        assert!(decorated.contains('\u{1b}'));
        assert_eq!(console::strip_ansi_codes(&decorated), plain);
    }

    #[test]
    fn test_record_fields_follow_producers() {
        let format =
            OutputFormat::default().with_suffix(Producer::custom("host", || "db1".to_string()));
        let record = build_record(&format, "saved", &ctx(Level::Debug));

        assert_eq!(
            record.keys().collect::<Vec<_>>(),
            vec!["time", "level", "location", "msg", "host"]
        );
        assert_eq!(record.get("level"), Some("[DEBUG]"));
        assert_eq!(record.get("msg"), Some("saved"));
        assert_eq!(record.get("location"), Some("server.rs:42"));
        assert_eq!(record.get("time"), Some("09:05:07"));
    }

    #[test]
    fn test_custom_producer_runs_once_per_message() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let format = OutputFormat::bare().with_suffix(Producer::custom("seq", move || {
            counter.fetch_add(1, Ordering::SeqCst).to_string()
        }));

        let rendered = render_message(&format, "a", &ctx(Level::Info));
        let plain = rendered.line(false);
        let decorated = rendered.line(true);
        let record = rendered.record();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(plain, "a | 0");
        assert_eq!(decorated, plain);
        assert_eq!(record.get("seq"), Some("0"));
    }

    #[test]
    fn test_rendered_field_keeps_plain_and_styled() {
        let field = render(&Producer::Level, &ctx(Level::Error));

        assert_eq!(field.name, "level");
        assert_eq!(field.plain, "[ERROR]");
        assert_eq!(console::strip_ansi_codes(&field.styled), field.plain);
    }
}
