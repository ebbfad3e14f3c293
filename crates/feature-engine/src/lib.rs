//! Feature Engineering Engine
//!
//! Turns validated vehicle records into the numeric matrix the price model
//! was fitted on: one-hot encoded categorical columns followed by the
//! polynomial expansion of the scaled numeric columns.

mod category;
mod encoder;
mod error;
mod onehot;
mod polynomial;
mod scaler;

pub use category::{categorize, CategoryLists, ModelCategory};
pub use encoder::{FeatureEncoder, CATEGORICAL_FEATURES, NUMERICAL_FEATURES};
pub use error::EncodeError;
pub use onehot::{HandleUnknown, OneHotEncoder};
pub use polynomial::PolynomialFeatures;
pub use scaler::StandardScaler;
