//! Human-readable duration and size literals
//!
//! `"5d"` → seconds, `"5mb"` → kilobytes. A literal is a run of ASCII
//! digits followed by a unit suffix with no further digits.

use crate::domain::error::{LogitError, LogitResult};

const DAY: u64 = 24 * 60 * 60;

const DURATION_UNITS: [(&str, u64); 4] = [
    ("d", DAY),
    ("w", 7 * DAY),
    ("m", 30 * DAY),
    ("y", 365 * DAY),
];

const SIZE_UNITS: [(&str, u64); 4] = [
    ("kb", 1),
    ("mb", 1_000),
    ("gb", 1_000_000),
    ("tb", 1_000_000_000),
];

/// Parse a duration literal (`d`, `w`, `m`, `y`) into seconds
pub fn parse_duration(text: &str) -> LogitResult<u64> {
    let (quantity, unit) = split_literal("duration", text)?;
    if unit.len() != 1 {
        return Err(LogitError::parse(
            "duration",
            text,
            "unit must be a single letter",
        ));
    }
    scale("duration", text, quantity, unit, &DURATION_UNITS)
}

/// Parse a size literal (`kb`, `mb`, `gb`, `tb`) into kilobytes
pub fn parse_size(text: &str) -> LogitResult<u64> {
    let (quantity, unit) = split_literal("size", text)?;
    scale("size", text, quantity, unit, &SIZE_UNITS)
}

fn split_literal<'a>(kind: &'static str, text: &'a str) -> LogitResult<(u64, &'a str)> {
    if !text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LogitError::parse(
            kind,
            text,
            "only digits and a unit are allowed",
        ));
    }

    let digits = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    let (quantity, unit) = text.split_at(digits);

    if quantity.is_empty() {
        return Err(LogitError::parse(kind, text, "missing leading quantity"));
    }
    if unit.is_empty() {
        return Err(LogitError::parse(kind, text, "missing unit"));
    }
    if unit.chars().any(|c| c.is_ascii_digit()) {
        return Err(LogitError::parse(kind, text, "digits after the unit"));
    }

    let quantity = quantity
        .parse::<u64>()
        .map_err(|e| LogitError::parse(kind, text, e.to_string()))?;
    Ok((quantity, unit))
}

fn scale(
    kind: &'static str,
    text: &str,
    quantity: u64,
    unit: &str,
    units: &[(&str, u64)],
) -> LogitResult<u64> {
    let multiplier = units
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(|| LogitError::parse(kind, text, format!("unknown unit '{unit}'")))?;

    quantity
        .checked_mul(multiplier)
        .ok_or_else(|| LogitError::parse(kind, text, "value overflows"))
}
