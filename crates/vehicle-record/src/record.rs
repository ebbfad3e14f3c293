//! Vehicle Record Types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Request payload as it arrives on the wire.
///
/// Every field is optional so that presence can be reported per field
/// instead of failing the whole body on the first absent key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawVehicleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paint_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_1: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_2: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_3: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_4: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_5: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_6: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_7: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_8: Option<bool>,
}

/// Equipment flags carried with every listing.
///
/// They are not part of the fitted feature layout and do not reach the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub feature_1: bool,
    pub feature_2: bool,
    pub feature_3: bool,
    pub feature_4: bool,
    pub feature_5: bool,
    pub feature_6: bool,
    pub feature_7: bool,
    pub feature_8: bool,
}

/// Validated vehicle record, ready for feature encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    /// Maker identifier, e.g. "BMW"
    pub maker_key: String,
    /// Model code, e.g. "320i"
    pub model_key: String,
    /// Odometer reading (km)
    pub mileage: f64,
    /// Engine power (kW)
    pub engine_power: f64,
    /// First registration date
    pub registration_date: NaiveDate,
    /// Fuel type
    pub fuel: String,
    pub paint_color: String,
    /// Body type
    pub car_type: String,
    /// Sale date
    pub sold_at: NaiveDate,
    #[serde(flatten)]
    pub flags: FeatureFlags,
}

impl VehicleRecord {
    pub fn registration_year(&self) -> i32 {
        self.registration_date.year()
    }

    pub fn registration_month(&self) -> u32 {
        self.registration_date.month()
    }

    pub fn sold_year(&self) -> i32 {
        self.sold_at.year()
    }

    pub fn sold_month(&self) -> u32 {
        self.sold_at.month()
    }
}
