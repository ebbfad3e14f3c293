//! Used-Car Price Service
//!
//! HTTP endpoint answering price predictions for batches of vehicle records.

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use inference_engine::{ArtifactBundle, ArtifactSummary, PricePredictor};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vehicle_record::Validator;

pub mod config;
pub mod error;
mod routes;

pub use crate::config::{AppConfig, LogFormat, LoggingConfig, ServerConfig};
pub use crate::error::{ApiError, ErrorResponse};

/// Application state shared across handlers.
///
/// Built once at startup; handlers only read it, apart from the counters.
pub struct AppState {
    /// Validation, encoding and model, loaded from the artifacts
    pub predictor: PricePredictor,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Records priced since startup
    pub served: AtomicU64,
    /// Requests answered with an error since startup
    pub failed: AtomicU64,
    /// Prometheus handle, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(predictor: PricePredictor, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            predictor,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            served: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            metrics,
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub artifacts: ArtifactSummary,
    pub metrics: ServiceMetrics,
}

/// Request counters
#[derive(Debug, Serialize)]
pub struct ServiceMetrics {
    pub predictions_served: u64,
    pub requests_failed: u64,
}

/// Create the application router, accepting bodies up to `max_body_bytes`
pub fn create_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(routes::metrics::render))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        artifacts: state.predictor.summary(),
        metrics: ServiceMetrics {
            predictions_served: state.served.load(Ordering::Relaxed),
            requests_failed: state.failed.load(Ordering::Relaxed),
        },
    })
}

/// Initialize logging. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ApiError::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Load the artifacts and assemble the predictor.
///
/// Fails if any artifact is missing, unreadable or inconsistent with the others.
pub fn build_predictor(config: &AppConfig) -> Result<PricePredictor, ApiError> {
    let bundle = ArtifactBundle::load(&config.artifacts)?;
    let predictor = bundle.into_predictor(
        config.categories.clone(),
        Validator::new(config.validation.clone()),
    )?;
    Ok(predictor)
}

/// Run the server until Ctrl-C
pub async fn run_server(config: AppConfig) -> Result<(), ApiError> {
    let predictor = build_predictor(&config).map_err(|e| {
        error!(error = %e, "Refusing to start without usable model artifacts");
        e
    })?;
    info!(
        feature_width = predictor.summary().feature_width,
        "Price predictor ready"
    );

    let metrics = if config.server.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| ApiError::Metrics(e.to_string()))?;
        Some(handle)
    } else {
        None
    };

    let state = Arc::new(AppState::new(predictor, metrics));
    let app = create_router(state, config.server.max_body_bytes);

    let addr = config.bind_addr();
    info!("Starting price service on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Price service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use inference_engine::ArtifactsConfig;
    use serde_json::Value;
    use std::path::Path;
    use tower::ServiceExt;

    pub(crate) fn test_config() -> AppConfig {
        AppConfig {
            artifacts: ArtifactsConfig::in_dir(
                Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts"),
            ),
            ..Default::default()
        }
    }

    pub(crate) fn test_state() -> Arc<AppState> {
        let predictor = build_predictor(&test_config()).unwrap();
        Arc::new(AppState::new(predictor, None))
    }

    pub(crate) fn app(state: Arc<AppState>) -> Router {
        create_router(state, ServerConfig::default().max_body_bytes)
    }

    pub(crate) fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(crate) async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state())
            .oneshot(get("/api/v1/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["artifacts"]["feature_width"], 88);
        assert_eq!(body["artifacts"]["poly_width"], 28);
        assert_eq!(body["artifacts"]["model_kind"], "linear");
        assert_eq!(body["artifacts"]["categories"]["entry"][0], "114");
        assert!(body["artifacts"]["categories"]["high"]
            .as_array()
            .unwrap()
            .contains(&Value::from("M5")));
    }

    #[tokio::test]
    async fn test_health_counts_requests() {
        let state = test_state();
        let ok = serde_json::json!([{
            "maker_key": "BMW", "model_key": "118d", "mileage": 80000,
            "engine_power": 105, "registration_date": "2014-03-01",
            "fuel": "diesel", "paint_color": "white", "car_type": "hatchback",
            "sold_at": "2018-02-01"
        }]);
        let bad = serde_json::json!([{"maker_key": "BMW"}]);

        app(state.clone()).oneshot(post_json("/predict", &ok)).await.unwrap();
        app(state.clone()).oneshot(post_json("/predict", &bad)).await.unwrap();

        let body = body_json(app(state).oneshot(get("/api/v1/health")).await.unwrap()).await;
        assert_eq!(body["metrics"]["predictions_served"], 1);
        assert_eq!(body["metrics"]["requests_failed"], 1);
    }

    #[test]
    fn test_missing_artifacts_fail_startup() {
        let config = AppConfig {
            artifacts: ArtifactsConfig::in_dir("/nonexistent/artifacts"),
            ..Default::default()
        };
        assert!(matches!(
            build_predictor(&config),
            Err(ApiError::Artifacts(_))
        ));
    }

    #[test]
    fn test_inconsistent_categories_fail_startup() {
        let mut config = test_config();
        config.categories.entry.push(String::new());
        assert!(matches!(
            build_predictor(&config),
            Err(ApiError::Artifacts(_))
        ));
    }
}
