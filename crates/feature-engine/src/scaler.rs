//! Standard Scaling of Numeric Columns

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

fn default_true() -> bool {
    true
}

/// Fitted standard scaler: `(x - mean) / scale` per column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_true")]
    pub with_mean: bool,
    #[serde(default = "default_true")]
    pub with_std: bool,
    /// Column names seen at fit time, when the artifact recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self {
            mean,
            scale,
            with_mean: true,
            with_std: true,
            feature_names: None,
        }
    }

    /// Number of input (and output) columns
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check internal consistency of the fitted parameters
    pub fn check(&self) -> Result<(), EncodeError> {
        let invalid = |reason: String| EncodeError::InvalidParameters {
            transform: "StandardScaler",
            reason,
        };

        if self.mean.len() != self.scale.len() {
            return Err(invalid(format!(
                "{} means for {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(invalid("non-finite statistic".to_string()));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(invalid(format!(
                    "{} feature names for {} columns",
                    names.len(),
                    self.mean.len()
                )));
            }
        }
        Ok(())
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, EncodeError> {
        if x.ncols() != self.n_features() {
            return Err(EncodeError::ColumnCountMismatch {
                transform: "StandardScaler",
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let mut out = x.to_owned();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let mean = if self.with_mean { self.mean[j] } else { 0.0 };
            // Constant columns are fitted with scale 0; leave them unscaled
            let scale = match self.scale[j] {
                s if !self.with_std || s == 0.0 => 1.0,
                s => s,
            };
            column.mapv_inplace(|v| (v - mean) / scale);
        }

        Ok(out)
    }
}
