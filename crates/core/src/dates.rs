//! Publish-date formatting for pet listings.
//!
//! Every API response renders publish dates as ISO-8601 calendar dates
//! (`YYYY-MM-DD`).

use chrono::NaiveDate;
use serde::Serializer;

use crate::error::CoreError;

/// `strftime` pattern for the wire representation.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a publish date in the wire format.
pub fn format_publish_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Parse a client-supplied publish date (`YYYY-MM-DD`).
pub fn parse_publish_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), WIRE_DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid publish date '{input}'. Expected format: YYYY-MM-DD"
        ))
    })
}

/// Serde adapter: `#[serde(serialize_with = "serialize_publish_date")]`.
pub fn serialize_publish_date<S: Serializer>(
    date: &NaiveDate,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_publish_date(*date))
}
