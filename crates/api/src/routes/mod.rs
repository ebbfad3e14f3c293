//! HTTP Routes

pub mod metrics;
pub mod predict;
