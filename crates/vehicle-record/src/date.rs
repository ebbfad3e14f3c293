//! Date parsing for registration and sale dates

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;

/// Parse an ISO date, a naive ISO datetime or an RFC 3339 timestamp.
///
/// Time-of-day and offsets are dropped; only the calendar date is kept.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }

    Err(ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
