//! Price Inference Engine
//!
//! Loads the fitted artifacts once and runs batch price predictions over
//! validated, encoded vehicle records.

mod artifacts;
mod model;
mod predictor;

pub use artifacts::{ArtifactBundle, ArtifactsConfig};
pub use model::RegressionModel;
pub use predictor::{ArtifactSummary, BatchPrediction, PredictError, PricePredictor};

use feature_engine::EncodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during artifact loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Artifact {path} unavailable: {reason}")]
    ArtifactUnavailable { path: PathBuf, reason: String },
    #[error("Artifacts are inconsistent: {0}")]
    InconsistentArtifacts(#[from] EncodeError),
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
}
