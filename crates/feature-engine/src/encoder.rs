//! Feature Matrix Assembly

use ndarray::{concatenate, Array2, Axis};
use tracing::debug;
use vehicle_record::VehicleRecord;

use crate::category::CategoryLists;
use crate::error::EncodeError;
use crate::onehot::OneHotEncoder;
use crate::polynomial::PolynomialFeatures;
use crate::scaler::StandardScaler;

/// Categorical inputs, in the order the one-hot encoder was fitted on
pub const CATEGORICAL_FEATURES: [&str; 6] = [
    "maker_key",
    "model_key",
    "fuel",
    "paint_color",
    "car_type",
    "model_category",
];

/// Numeric inputs, in the order the scaler was fitted on
pub const NUMERICAL_FEATURES: [&str; 6] = [
    "mileage",
    "engine_power",
    "registration_year",
    "registration_month",
    "sold_year",
    "sold_month",
];

/// Encoder from vehicle records to the model's feature matrix.
///
/// Holds the fitted transforms read-only; one instance serves every request.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    one_hot: OneHotEncoder,
    scaler: StandardScaler,
    poly: PolynomialFeatures,
    categories: CategoryLists,
}

impl FeatureEncoder {
    /// Assemble an encoder, rejecting transforms whose shapes or recorded
    /// feature names do not line up with the fixed feature lists.
    pub fn new(
        one_hot: OneHotEncoder,
        scaler: StandardScaler,
        poly: PolynomialFeatures,
        categories: CategoryLists,
    ) -> Result<Self, EncodeError> {
        one_hot.check()?;
        scaler.check()?;
        poly.check()?;
        categories.check()?;

        expect_columns("OneHotEncoder", CATEGORICAL_FEATURES.len(), one_hot.n_features())?;
        expect_columns("StandardScaler", NUMERICAL_FEATURES.len(), scaler.n_features())?;
        expect_columns("PolynomialFeatures", scaler.n_features(), poly.n_features_in)?;

        expect_names("OneHotEncoder", one_hot.feature_names.as_deref(), &CATEGORICAL_FEATURES)?;
        expect_names("StandardScaler", scaler.feature_names.as_deref(), &NUMERICAL_FEATURES)?;

        let encoder = Self {
            one_hot,
            scaler,
            poly,
            categories,
        };
        debug!(
            one_hot_width = encoder.one_hot_width(),
            poly_width = encoder.poly_width(),
            "Feature encoder assembled"
        );
        Ok(encoder)
    }

    /// Width of the one-hot block
    pub fn one_hot_width(&self) -> usize {
        self.one_hot.output_width()
    }

    /// Width of the polynomial block
    pub fn poly_width(&self) -> usize {
        self.poly.output_width()
    }

    /// Total number of columns per encoded record
    pub fn feature_width(&self) -> usize {
        self.one_hot_width() + self.poly_width()
    }

    pub fn categories(&self) -> &CategoryLists {
        &self.categories
    }

    /// Categorical values of one record, in [`CATEGORICAL_FEATURES`] order
    pub fn categorical_row<'a>(&self, record: &'a VehicleRecord) -> Vec<&'a str> {
        vec![
            record.maker_key.as_str(),
            record.model_key.as_str(),
            record.fuel.as_str(),
            record.paint_color.as_str(),
            record.car_type.as_str(),
            self.categories.categorize(&record.model_key).as_str(),
        ]
    }

    /// Numeric values of one record, in [`NUMERICAL_FEATURES`] order
    pub fn numeric_row(record: &VehicleRecord) -> [f64; 6] {
        [
            record.mileage,
            record.engine_power,
            record.registration_year() as f64,
            record.registration_month() as f64,
            record.sold_year() as f64,
            record.sold_month() as f64,
        ]
    }

    /// Encode a batch of records, one output row per record
    pub fn encode(&self, records: &[VehicleRecord]) -> Result<Array2<f64>, EncodeError> {
        let categorical: Vec<Vec<&str>> =
            records.iter().map(|r| self.categorical_row(r)).collect();
        let x_categorical = self.one_hot.transform(&categorical)?;

        let numeric: Vec<[f64; 6]> = records.iter().map(Self::numeric_row).collect();
        let x_numeric = Array2::from_shape_fn((records.len(), NUMERICAL_FEATURES.len()), |(i, j)| {
            numeric[i][j]
        });
        let x_scaled = self.scaler.transform(x_numeric.view())?;
        let x_poly = self.poly.transform(x_scaled.view())?;

        let x = concatenate(Axis(1), &[x_categorical.view(), x_poly.view()])?;
        debug!(rows = x.nrows(), cols = x.ncols(), "Encoded batch");
        Ok(x)
    }
}

fn expect_columns(
    transform: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), EncodeError> {
    if expected != actual {
        return Err(EncodeError::ColumnCountMismatch {
            transform,
            expected,
            actual,
        });
    }
    Ok(())
}

fn expect_names(
    transform: &'static str,
    fitted: Option<&[String]>,
    expected: &[&str],
) -> Result<(), EncodeError> {
    match fitted {
        Some(fitted) if !fitted.iter().map(String::as_str).eq(expected.iter().copied()) => {
            Err(EncodeError::FeatureNameMismatch {
                transform,
                fitted: fitted.to_vec(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
            })
        }
        _ => Ok(()),
    }
}
