//! Service Configuration
//!
//! Read once at startup from an optional TOML file, then environment
//! variables prefixed `CAR_PRICE__` (sections separated by `__`, e.g.
//! `CAR_PRICE__SERVER__PORT=8080`).

use config::{Config, Environment, File};
use feature_engine::CategoryLists;
use inference_engine::ArtifactsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vehicle_record::ValidationConfig;

use crate::error::ApiError;

/// Config file used when `CAR_PRICE_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/service.toml";

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "CAR_PRICE_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    /// Model code prefixes per price band
    pub categories: CategoryLists,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Install the Prometheus recorder and serve `/metrics`
    pub metrics_enabled: bool,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            metrics_enabled: true,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error or a full
    /// `EnvFilter` expression). `RUST_LOG` takes precedence.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load from `$CAR_PRICE_CONFIG`, falling back to the default path
    pub fn load() -> Result<Self, ApiError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from_path(&path)
    }

    /// Load from a specific path. A missing file leaves every value at its default.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ApiError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("CAR_PRICE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Socket address to listen on
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.artifacts.model_path(), PathBuf::from("artifacts/model.json"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.server.metrics_enabled);
        assert_eq!(config.categories, CategoryLists::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/service.toml").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.artifacts.encoder_file, "ohe.json");
    }

    #[test]
    fn test_file_overrides() {
        let path = write_config(
            "service-overrides",
            r#"
[server]
host = "127.0.0.1"
port = 8081
max_body_bytes = 1048576

[artifacts]
dir = "/srv/car-price"
model_file = "ridge.json"

[categories]
entry = ["1"]
middle = ["3", "5"]
high = ["7", "M"]

[validation]
mileage_range = [0.0, 500000.0]

[logging]
level = "debug"
format = "json"
"#,
        );

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(config.server.max_body_bytes, 1_048_576);
        assert_eq!(config.artifacts.model_path(), PathBuf::from("/srv/car-price/ridge.json"));
        assert_eq!(config.artifacts.scaler_file, "scaler.json");
        assert_eq!(config.categories.middle, vec!["3", "5"]);
        assert_eq!(config.validation.mileage_range, (0.0, 500_000.0));
        assert_eq!(config.validation.year_range, (1900, 2100));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_value_is_error() {
        let path = write_config("service-invalid", "[server]\nport = \"not a port\"\n");
        assert!(matches!(
            AppConfig::load_from_path(&path),
            Err(ApiError::Config(_))
        ));
        fs::remove_file(path).ok();
    }
}
