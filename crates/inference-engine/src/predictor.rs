//! Batch Price Prediction

use feature_engine::{CategoryLists, EncodeError, FeatureEncoder};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use vehicle_record::{RawVehicleRecord, ValidationError, Validator, VehicleRecord};

use crate::model::RegressionModel;
use crate::InferenceError;

/// Failure of a prediction request. The batch fails as a whole.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Body is not a JSON array of record objects
    #[error("Malformed request body: {0}")]
    Payload(String),
    /// A record failed presence or range checks
    #[error("Invalid record at index {index}: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },
    /// Records were valid but could not be encoded
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// Predictions for one batch
#[derive(Debug, Clone)]
pub struct BatchPrediction {
    /// One price per input record, in input order
    pub prices: Vec<f64>,
    /// Encode + inference time in microseconds
    pub latency_us: u64,
}

/// Shape of the loaded artifacts, for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub one_hot_width: usize,
    pub poly_width: usize,
    pub feature_width: usize,
    pub model_kind: &'static str,
    /// Model code prefixes per price band
    pub categories: CategoryLists,
}

/// Immutable prediction pipeline: validation, encoding and the fitted model
pub struct PricePredictor {
    validator: Validator,
    encoder: FeatureEncoder,
    model: RegressionModel,
}

impl PricePredictor {
    pub fn new(
        validator: Validator,
        encoder: FeatureEncoder,
        model: RegressionModel,
    ) -> Result<Self, InferenceError> {
        if model.n_features() != encoder.feature_width() {
            return Err(InferenceError::ShapeMismatch {
                expected: encoder.feature_width(),
                actual: model.n_features(),
            });
        }
        Ok(Self {
            validator,
            encoder,
            model,
        })
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            one_hot_width: self.encoder.one_hot_width(),
            poly_width: self.encoder.poly_width(),
            feature_width: self.encoder.feature_width(),
            model_kind: self.model.kind(),
            categories: self.encoder.categories().clone(),
        }
    }

    /// Validate every raw record; the first invalid one fails the batch
    pub fn validate(&self, raw: &[RawVehicleRecord]) -> Result<Vec<VehicleRecord>, PredictError> {
        raw.iter()
            .enumerate()
            .map(|(index, record)| {
                self.validator
                    .validate(record)
                    .map_err(|source| PredictError::Validation { index, source })
            })
            .collect()
    }

    /// Encode and predict a batch of validated records
    pub fn predict(&self, records: &[VehicleRecord]) -> Result<BatchPrediction, PredictError> {
        let start = std::time::Instant::now();

        let x = self.encoder.encode(records)?;
        let prices = self.model.predict(x.view())?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(rows = prices.len(), latency_us, "Batch predicted");

        Ok(BatchPrediction { prices, latency_us })
    }

    /// Validate, encode and predict a batch of raw records
    pub fn predict_raw(&self, raw: &[RawVehicleRecord]) -> Result<BatchPrediction, PredictError> {
        let records = self.validate(raw)?;
        self.predict(&records)
    }
}
