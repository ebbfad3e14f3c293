//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::{InferenceError, PredictError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the service, at startup or while answering a request
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Model artifacts unusable: {0}")]
    Artifacts(#[from] InferenceError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Metrics setup failed: {0}")]
    Metrics(String),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Body of every failed response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
