//! Zone identifiers and the fixed textual timestamp format.

use crate::error::{DemandError, Result};
use chrono::NaiveDateTime;

/// Identifier of a geographic zone.
pub type ZoneId = u32;

/// Format accepted from callers and echoed back in interval forecasts.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).map_err(|e| {
        DemandError::TimestampFormat {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
