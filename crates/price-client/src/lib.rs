//! Price Client
//!
//! Collects one vehicle's details and asks the price service for a quote.

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Args};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use vehicle_record::{FeatureFlags, VehicleRecord};

/// Service endpoint used when `--url` is not given
pub const DEFAULT_URL: &str = "http://localhost:5000/predict";

pub const FUEL_CHOICES: [&str; 4] = ["petrol", "diesel", "electric", "hybrid"];
pub const CAR_TYPE_CHOICES: [&str; 5] = ["sedan", "coupe", "suv", "hatchback", "convertible"];

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Service answered with an error body
    #[error("{0}")]
    Service(String),
    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// Vehicle details, one flag per form field
#[derive(Debug, Clone, Args)]
pub struct VehicleForm {
    /// Maker
    #[arg(long, default_value = "BMW")]
    pub maker: String,

    /// Model code
    #[arg(long, default_value = "320i")]
    pub model: String,

    /// Mileage in kilometres
    #[arg(long, default_value_t = 20_000.0)]
    pub mileage: f64,

    /// Engine power
    #[arg(long, default_value_t = 150.0)]
    pub engine_power: f64,

    /// Registration date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub registration_date: Option<NaiveDate>,

    /// Sale date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub sold_at: Option<NaiveDate>,

    #[arg(long, default_value = "petrol", value_parser = FUEL_CHOICES)]
    pub fuel: String,

    #[arg(long, default_value = "black")]
    pub paint_color: String,

    #[arg(long, default_value = "sedan", value_parser = CAR_TYPE_CHOICES)]
    pub car_type: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_1: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_2: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub feature_3: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_4: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_5: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_6: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub feature_7: bool,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub feature_8: bool,
}

impl VehicleForm {
    /// Build the record, filling missing dates with `today`
    pub fn to_record(&self, today: NaiveDate) -> VehicleRecord {
        VehicleRecord {
            maker_key: self.maker.clone(),
            model_key: self.model.clone(),
            mileage: self.mileage,
            engine_power: self.engine_power,
            registration_date: self.registration_date.unwrap_or(today),
            fuel: self.fuel.clone(),
            paint_color: self.paint_color.clone(),
            car_type: self.car_type.clone(),
            sold_at: self.sold_at.unwrap_or(today),
            flags: FeatureFlags {
                feature_1: self.feature_1,
                feature_2: self.feature_2,
                feature_3: self.feature_3,
                feature_4: self.feature_4,
                feature_5: self.feature_5,
                feature_6: self.feature_6,
                feature_7: self.feature_7,
                feature_8: self.feature_8,
            },
        }
    }
}

/// Body of a service response
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Reply {
    Prices(Vec<f64>),
    Error { error: String },
}

/// Interpret a service response. Success carries the first price.
pub fn parse_reply(status: u16, body: &str) -> Result<f64, ClientError> {
    let unexpected = || ClientError::Unexpected {
        status,
        body: body.to_string(),
    };

    match serde_json::from_str::<Reply>(body) {
        Ok(Reply::Prices(prices)) if status == 200 => prices.first().copied().ok_or_else(unexpected),
        Ok(Reply::Error { error }) => Err(ClientError::Service(error)),
        _ => Err(unexpected()),
    }
}

/// HTTP client for the prediction endpoint
pub struct PriceClient {
    http: reqwest::Client,
    url: String,
}

impl PriceClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Post a single-record batch and return its price
    pub async fn quote(&self, record: &VehicleRecord) -> Result<f64, ClientError> {
        let response = self
            .http
            .post(&self.url)
            .json(&[record])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, %body, "Price service replied");

        parse_reply(status, &body)
    }
}

/// Today in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
