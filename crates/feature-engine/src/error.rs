//! Encoding Error Types

use thiserror::Error;

/// Errors raised by the fitted transforms
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Category not seen at fit time and the encoder is configured to fail
    #[error("Unknown category {value:?} for feature {feature}")]
    UnknownCategory { feature: String, value: String },

    /// Input column count differs from the fitted column count
    #[error("{transform} expects {expected} columns, got {actual}")]
    ColumnCountMismatch {
        transform: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Fitted feature names differ from the names used at inference time
    #[error("{transform} was fitted on {fitted:?}, but inference uses {expected:?}")]
    FeatureNameMismatch {
        transform: &'static str,
        fitted: Vec<String>,
        expected: Vec<String>,
    },

    /// Artifact parameters are internally inconsistent
    #[error("Invalid {transform} parameters: {reason}")]
    InvalidParameters {
        transform: &'static str,
        reason: String,
    },

    /// Array assembly failed
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
