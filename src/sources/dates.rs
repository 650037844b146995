use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::errors::{DigestError, DigestResult};

/// One candidate layout for a feed date
#[derive(Debug, Clone, Copy)]
pub enum DateFormat {
    Rfc3339,
    Rfc2822,
    /// strftime pattern that includes an offset
    WithOffset(&'static str),
    /// strftime pattern without offset, read as UTC
    Naive(&'static str),
    /// strftime date-only pattern, midnight UTC
    DateOnly(&'static str),
}

impl DateFormat {
    fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        match self {
            DateFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::Rfc2822 => DateTime::parse_from_rfc2822(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::WithOffset(pattern) => DateTime::parse_from_str(raw, pattern)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DateFormat::Naive(pattern) => NaiveDateTime::parse_from_str(raw, pattern)
                .ok()
                .map(|dt| dt.and_utc()),
            DateFormat::DateOnly(pattern) => NaiveDate::parse_from_str(raw, pattern)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc()),
        }
    }
}

/// Try each format in order; the first that parses wins
pub fn parse_with_formats(raw: &str, formats: &[DateFormat]) -> DigestResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DigestError::Parse("empty date".to_string()));
    }

    formats
        .iter()
        .find_map(|format| format.parse(raw))
        .ok_or_else(|| DigestError::Parse(format!("unrecognized date: {}", raw)))
}
