//! Fitted Artifact Loading

use feature_engine::{CategoryLists, FeatureEncoder, OneHotEncoder, PolynomialFeatures, StandardScaler};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vehicle_record::Validator;

use crate::model::RegressionModel;
use crate::predictor::PricePredictor;
use crate::InferenceError;

/// Location of the four fitted artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding the artifact files
    pub dir: PathBuf,
    pub encoder_file: String,
    pub scaler_file: String,
    pub poly_file: String,
    pub model_file: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            encoder_file: "ohe.json".to_string(),
            scaler_file: "scaler.json".to_string(),
            poly_file: "poly.json".to_string(),
            model_file: "model.json".to_string(),
        }
    }
}

impl ArtifactsConfig {
    /// Config for the default file names under `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.dir.join(&self.encoder_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }

    pub fn poly_path(&self) -> PathBuf {
        self.dir.join(&self.poly_file)
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model_file)
    }
}

/// The four fitted artifacts, as read from disk
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub one_hot: OneHotEncoder,
    pub scaler: StandardScaler,
    pub poly: PolynomialFeatures,
    pub model: RegressionModel,
}

impl ArtifactBundle {
    /// Read all four artifacts. Any missing or unreadable file is an error;
    /// nothing is served from a partial bundle.
    pub fn load(config: &ArtifactsConfig) -> Result<Self, InferenceError> {
        info!(dir = %config.dir.display(), "Loading model artifacts");

        let bundle = Self {
            one_hot: load_json(&config.encoder_path())?,
            scaler: load_json(&config.scaler_path())?,
            poly: load_json(&config.poly_path())?,
            model: load_json(&config.model_path())?,
        };

        info!(
            one_hot_width = bundle.one_hot.output_width(),
            poly_width = bundle.poly.output_width(),
            model = bundle.model.kind(),
            "Model artifacts loaded"
        );
        Ok(bundle)
    }

    /// Assemble the immutable predictor, cross-checking artifact shapes
    pub fn into_predictor(
        self,
        categories: CategoryLists,
        validator: Validator,
    ) -> Result<PricePredictor, InferenceError> {
        let encoder = FeatureEncoder::new(self.one_hot, self.scaler, self.poly, categories)?;
        PricePredictor::new(validator, encoder, self.model)
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, InferenceError> {
    let unavailable = |reason: String| {
        warn!(path = %path.display(), %reason, "Artifact unavailable");
        InferenceError::ArtifactUnavailable {
            path: path.to_path_buf(),
            reason,
        }
    };

    let text = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| unavailable(e.to_string()))
}
