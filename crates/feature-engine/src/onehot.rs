//! One-Hot Encoding of Categorical Columns

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::EncodeError;

/// Behaviour for categories not seen at fit time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleUnknown {
    /// Fail the whole batch
    #[default]
    Error,
    /// Emit an all-zero block for that column
    Ignore,
}

/// Fitted one-hot encoder.
///
/// `categories[j]` lists the known values of input column `j`; the output
/// holds one indicator column per known value, column blocks in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    /// Column names seen at fit time, when the artifact recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl OneHotEncoder {
    pub fn new(categories: Vec<Vec<String>>, handle_unknown: HandleUnknown) -> Self {
        Self {
            categories,
            handle_unknown,
            feature_names: None,
        }
    }

    /// Number of input columns
    pub fn n_features(&self) -> usize {
        self.categories.len()
    }

    /// Number of output columns
    pub fn output_width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Check internal consistency of the fitted parameters
    pub fn check(&self) -> Result<(), EncodeError> {
        if let Some(names) = &self.feature_names {
            if names.len() != self.categories.len() {
                return Err(EncodeError::InvalidParameters {
                    transform: "OneHotEncoder",
                    reason: format!(
                        "{} feature names for {} category lists",
                        names.len(),
                        self.categories.len()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Encode rows of category values
    pub fn transform(&self, rows: &[Vec<&str>]) -> Result<Array2<f64>, EncodeError> {
        let mut out = Array2::zeros((rows.len(), self.output_width()));

        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.n_features() {
                return Err(EncodeError::ColumnCountMismatch {
                    transform: "OneHotEncoder",
                    expected: self.n_features(),
                    actual: row.len(),
                });
            }

            let mut offset = 0;
            for (j, (value, known)) in row.iter().zip(&self.categories).enumerate() {
                match known.iter().position(|c| c.as_str() == *value) {
                    Some(k) => out[[i, offset + k]] = 1.0,
                    None if self.handle_unknown == HandleUnknown::Ignore => {}
                    None => {
                        return Err(EncodeError::UnknownCategory {
                            feature: self.column_name(j),
                            value: value.to_string(),
                        })
                    }
                }
                offset += known.len();
            }
        }

        Ok(out)
    }

    fn column_name(&self, j: usize) -> String {
        self.feature_names
            .as_ref()
            .and_then(|names| names.get(j).cloned())
            .unwrap_or_else(|| format!("x{}", j))
    }
}
