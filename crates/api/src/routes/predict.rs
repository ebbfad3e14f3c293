//! Prediction Route

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use inference_engine::PredictError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vehicle_record::RawVehicleRecord;

use crate::error::ApiError;
use crate::AppState;

/// Predict prices for a JSON array of vehicle records.
///
/// Answers with one price per record, in input order. Any failure, from body
/// buffering to inference, fails the whole batch with a 500 and an `error` message.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Vec<f64>>, ApiError> {
    let outcome = body
        .map_err(|rejection| {
            warn!(error = %rejection.body_text(), "Request body rejected");
            PredictError::Payload(rejection.body_text())
        })
        .and_then(|body| run_batch(&state, &body));

    match outcome {
        Ok(prices) => {
            state.served.fetch_add(prices.len() as u64, Ordering::Relaxed);
            metrics::counter!("price_predictions_total").increment(prices.len() as u64);
            Ok(Json(prices))
        }
        Err(e) => {
            state.failed.fetch_add(1, Ordering::Relaxed);
            metrics::counter!("price_prediction_failures_total").increment(1);
            Err(e.into())
        }
    }
}

#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4(), batch_size = tracing::field::Empty))]
fn run_batch(state: &AppState, body: &[u8]) -> Result<Vec<f64>, PredictError> {
    let raw: Vec<RawVehicleRecord> =
        serde_json::from_slice(body).map_err(|e| PredictError::Payload(e.to_string()))?;
    tracing::Span::current().record("batch_size", raw.len() as u64);

    let result = state.predictor.predict_raw(&raw).map_err(|e| {
        warn!(error = %e, "Prediction request failed");
        e
    })?;

    metrics::histogram!("price_prediction_latency_seconds")
        .record(result.latency_us as f64 / 1_000_000.0);
    info!(latency_us = result.latency_us, "Prediction request served");

    Ok(result.prices)
}

#[cfg(test)]
mod tests {
    use crate::tests::{app, body_json, post_json, test_state};
    use crate::{create_router, ServerConfig};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn canonical() -> Value {
        json!({
            "maker_key": "BMW",
            "model_key": "320i",
            "mileage": 50000,
            "engine_power": 140,
            "registration_date": "2015-01-01",
            "fuel": "diesel",
            "paint_color": "black",
            "car_type": "sedan",
            "sold_at": "2020-06-01",
            "feature_1": true,
            "feature_2": true,
            "feature_3": false,
            "feature_4": true,
            "feature_5": true,
            "feature_6": true,
            "feature_7": true,
            "feature_8": false
        })
    }

    #[tokio::test]
    async fn test_canonical_record() {
        let response = app(test_state())
            .oneshot(post_json("/predict", &json!([canonical()])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let prices = body.as_array().unwrap();
        assert_eq!(prices.len(), 1);
        let price = prices[0].as_f64().unwrap();
        assert!((price - 25_500.24).abs() < 0.01, "price = {}", price);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let response = app(test_state())
            .oneshot(post_json("/predict", &json!([])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_batch_order_preserved() {
        let state = test_state();
        let models = ["X5", "118d", "320i", "999"];
        let batch: Vec<Value> = models
            .iter()
            .map(|m| {
                let mut record = canonical();
                record["model_key"] = json!(m);
                record
            })
            .collect();

        let response = app(state.clone())
            .oneshot(post_json("/predict", &Value::Array(batch.clone())))
            .await
            .unwrap();
        let together = body_json(response).await;
        assert_eq!(together.as_array().unwrap().len(), models.len());

        for (i, record) in batch.into_iter().enumerate() {
            let response = app(state.clone())
                .oneshot(post_json("/predict", &json!([record])))
                .await
                .unwrap();
            assert_eq!(body_json(response).await[0], together[i]);
        }
    }

    #[tokio::test]
    async fn test_bad_date_is_server_error() {
        let mut record = canonical();
        record["registration_date"] = json!("not-a-date");

        let response = app(test_state())
            .oneshot(post_json("/predict", &json!([record])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid record at index 0"), "{}", message);
        assert!(message.contains("not-a-date"));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_one_bad_record_fails_batch() {
        let mut missing = canonical();
        missing.as_object_mut().unwrap().remove("mileage");

        let response = app(test_state())
            .oneshot(post_json("/predict", &json!([canonical(), missing])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Invalid record at index 1: Missing required field: mileage"
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        for body in [json!({"maker_key": "BMW"}), json!([{"mileage": "far"}]), json!("text")] {
            let response = app(test_state())
                .oneshot(post_json("/predict", &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(response).await;
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("Malformed request body"));
        }
    }

    #[tokio::test]
    async fn test_oversized_body_is_json_error() {
        let state = test_state();
        let batch = Value::Array(vec![canonical(); 20]);
        let router = create_router(state.clone(), 1024);

        let response = router.oneshot(post_json("/predict", &batch)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Malformed request body"));
        assert_eq!(state.failed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_batch_above_two_megabytes() {
        let batch = Value::Array(vec![canonical(); 12_000]);
        assert!(batch.to_string().len() > 2 * 1024 * 1024);
        assert!(batch.to_string().len() < ServerConfig::default().max_body_bytes);

        let response = app(test_state())
            .oneshot(post_json("/predict", &batch))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 12_000);
    }

    #[tokio::test]
    async fn test_route_is_write_only() {
        let request = axum::http::Request::builder()
            .method("GET")
            .uri("/predict")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
