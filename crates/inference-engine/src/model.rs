//! Regression Model Artifact

use ndarray::{ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::InferenceError;

/// Fitted regression model, tagged by `kind` in the artifact file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegressionModel {
    /// `price = x · coefficients + intercept`
    Linear {
        coefficients: Vec<f64>,
        intercept: f64,
    },
}

impl RegressionModel {
    pub fn kind(&self) -> &'static str {
        match self {
            RegressionModel::Linear { .. } => "linear",
        }
    }

    /// Number of input features the model was fitted on
    pub fn n_features(&self) -> usize {
        match self {
            RegressionModel::Linear { coefficients, .. } => coefficients.len(),
        }
    }

    /// Predict one value per row of `x`.
    ///
    /// Rows are scored one at a time so a record's price does not depend on
    /// the batch it arrives in.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<f64>, InferenceError> {
        if x.ncols() != self.n_features() {
            return Err(InferenceError::ShapeMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let predictions = match self {
            RegressionModel::Linear {
                coefficients,
                intercept,
            } => {
                let weights = ArrayView1::from(coefficients.as_slice());
                x.axis_iter(Axis(0))
                    .map(|row| row.dot(&weights) + *intercept)
                    .collect::<Vec<f64>>()
            }
        };

        if let Some(row) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::InferenceFailed(format!(
                "non-finite prediction for row {}",
                row
            )));
        }

        Ok(predictions)
    }
}
