//! Vehicle Record Schema and Validation
//!
//! Provides the raw request payload type, the validated vehicle record and
//! presence/range checks performed before feature encoding.

mod date;
mod error;
mod record;
mod validator;

pub use date::parse_date;
pub use error::ValidationError;
pub use record::{FeatureFlags, RawVehicleRecord, VehicleRecord};
pub use validator::{ValidationConfig, Validator};
