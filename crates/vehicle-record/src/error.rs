//! Validation Error Types

use thiserror::Error;

/// Errors raised while turning a raw payload into a vehicle record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent or null
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Text field present but blank
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),

    /// Numeric value is NaN or infinite
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Date string could not be parsed
    #[error("{field} is not a valid date: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    /// Parsed date has an implausible year
    #[error("{field} year {year} is out of range [{min}, {max}]")]
    YearOutOfRange {
        field: &'static str,
        year: i32,
        min: i32,
        max: i32,
    },
}
