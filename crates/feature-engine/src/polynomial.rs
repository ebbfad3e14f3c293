//! Polynomial Feature Expansion

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

fn default_true() -> bool {
    true
}

/// Fitted polynomial expander.
///
/// Output columns are the bias (if enabled) followed, for each degree from 1
/// up to `degree`, by the products of every index combination of that size
/// in lexicographic order. With `interaction_only` no index repeats.
///
/// For two inputs `[a, b]` at degree 2: `[1, a, b, a², ab, b²]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFeatures {
    pub n_features_in: usize,
    pub degree: u32,
    #[serde(default = "default_true")]
    pub include_bias: bool,
    #[serde(default)]
    pub interaction_only: bool,
}

impl PolynomialFeatures {
    pub fn new(n_features_in: usize, degree: u32) -> Self {
        Self {
            n_features_in,
            degree,
            include_bias: true,
            interaction_only: false,
        }
    }

    /// Number of output columns
    pub fn output_width(&self) -> usize {
        self.combinations().len()
    }

    /// Check internal consistency of the fitted parameters
    pub fn check(&self) -> Result<(), EncodeError> {
        if self.output_width() == 0 {
            return Err(EncodeError::InvalidParameters {
                transform: "PolynomialFeatures",
                reason: "expansion produces no columns".to_string(),
            });
        }
        Ok(())
    }

    /// Input column indices multiplied together for each output column
    pub fn combinations(&self) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        if self.include_bias {
            out.push(Vec::new());
        }
        for d in 1..=self.degree as usize {
            let mut current = Vec::with_capacity(d);
            self.push_combinations(d, 0, &mut current, &mut out);
        }
        out
    }

    fn push_combinations(
        &self,
        size: usize,
        start: usize,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if current.len() == size {
            out.push(current.clone());
            return;
        }
        for idx in start..self.n_features_in {
            current.push(idx);
            let next = if self.interaction_only { idx + 1 } else { idx };
            self.push_combinations(size, next, current, out);
            current.pop();
        }
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, EncodeError> {
        if x.ncols() != self.n_features_in {
            return Err(EncodeError::ColumnCountMismatch {
                transform: "PolynomialFeatures",
                expected: self.n_features_in,
                actual: x.ncols(),
            });
        }

        let combos = self.combinations();
        let mut out = Array2::zeros((x.nrows(), combos.len()));
        for (i, row) in x.outer_iter().enumerate() {
            for (k, combo) in combos.iter().enumerate() {
                out[[i, k]] = combo.iter().map(|&j| row[j]).product::<f64>();
            }
        }

        Ok(out)
    }
}
