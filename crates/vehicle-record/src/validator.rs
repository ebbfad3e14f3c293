//! Record Validator for Presence and Range Checking

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::parse_date;
use crate::error::ValidationError;
use crate::record::{FeatureFlags, RawVehicleRecord, VehicleRecord};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Mileage valid range (km)
    pub mileage_range: (f64, f64),
    /// Engine power valid range (kW)
    pub engine_power_range: (f64, f64),
    /// Accepted calendar years for registration and sale dates
    pub year_range: (i32, i32),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mileage_range: (0.0, 2_000_000.0),
            engine_power_range: (0.0, 1_500.0),
            year_range: (1900, 2100),
        }
    }
}

/// Validator turning raw payloads into vehicle records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate one raw record.
    ///
    /// Fields are checked in payload order and the first failure is returned.
    /// Absent feature flags read as `false`.
    pub fn validate(&self, raw: &RawVehicleRecord) -> Result<VehicleRecord, ValidationError> {
        let maker_key = required_text("maker_key", raw.maker_key.as_deref())?;
        let model_key = required_text("model_key", raw.model_key.as_deref())?;

        let mileage = required("mileage", raw.mileage)?;
        self.validate_range("mileage", mileage, self.config.mileage_range)?;

        let engine_power = required("engine_power", raw.engine_power)?;
        self.validate_range("engine_power", engine_power, self.config.engine_power_range)?;

        let registration_date = self.validate_date(
            "registration_date",
            raw.registration_date.as_deref(),
        )?;
        let fuel = required_text("fuel", raw.fuel.as_deref())?;
        let paint_color = required_text("paint_color", raw.paint_color.as_deref())?;
        let car_type = required_text("car_type", raw.car_type.as_deref())?;
        let sold_at = self.validate_date("sold_at", raw.sold_at.as_deref())?;

        let flags = FeatureFlags {
            feature_1: raw.feature_1.unwrap_or(false),
            feature_2: raw.feature_2.unwrap_or(false),
            feature_3: raw.feature_3.unwrap_or(false),
            feature_4: raw.feature_4.unwrap_or(false),
            feature_5: raw.feature_5.unwrap_or(false),
            feature_6: raw.feature_6.unwrap_or(false),
            feature_7: raw.feature_7.unwrap_or(false),
            feature_8: raw.feature_8.unwrap_or(false),
        };

        debug!(model_key = %model_key, "Record validated");

        Ok(VehicleRecord {
            maker_key,
            model_key,
            mileage,
            engine_power,
            registration_date,
            fuel,
            paint_color,
            car_type,
            sold_at,
            flags,
        })
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(field));
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    fn validate_date(
        &self,
        field: &'static str,
        value: Option<&str>,
    ) -> Result<NaiveDate, ValidationError> {
        let value = value.ok_or(ValidationError::MissingField(field))?;
        let date = parse_date(field, value)?;
        let (min, max) = self.config.year_range;
        if date.year() < min || date.year() > max {
            return Err(ValidationError::YearOutOfRange {
                field,
                year: date.year(),
                min,
                max,
            });
        }
        Ok(date)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

fn required_text(field: &'static str, value: Option<&str>) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value.to_string())
}
