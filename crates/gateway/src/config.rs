use common::{Environment, LogLevel};
use inference::{DetectOptions, ExecutionProvider};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/fasterrcnn_resnet50_fpn.onnx";
pub const DEFAULT_MAX_UPLOAD_BYTES: i64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub model_path: String,
    pub execution_provider: ExecutionProvider,
    pub intra_threads: usize,
    pub max_upload_bytes: usize,
    pub log_level: LogLevel,
    pub environment: Environment,
    pub otel_endpoint: Option<String>,
    pub detection: DetectOptions,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults overlaid with `GATEWAY_*` environment variables.
///
/// Nested keys use `__`, e.g. `GATEWAY_DETECTION__MAX_RESULTS=5`.
pub fn get_configuration() -> Result<Config, config::ConfigError> {
    load(env_source())
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("GATEWAY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load(source: config::Environment) -> Result<Config, config::ConfigError> {
    let config = config::Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", 5000)?
        .set_default("upload_dir", "uploads")?
        .set_default("model_path", DEFAULT_MODEL_PATH)?
        .set_default("execution_provider", "cpu")?
        .set_default("intra_threads", inference::backend::ort::DEFAULT_INTRA_THREADS as i64)?
        .set_default("max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES)?
        .set_default("log_level", "info")?
        .set_default("environment", "development")?
        .set_default(
            "detection.confidence_threshold",
            f64::from(inference::config::DEFAULT_CONFIDENCE_THRESHOLD),
        )?
        .set_default(
            "detection.max_results",
            inference::config::DEFAULT_MAX_RESULTS as i64,
        )?
        .set_default("detection.label_space", "coco91")?
        .add_source(source)
        .build()?;

    config.try_deserialize::<Config>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference::LabelSpace;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        load(env_source().source(Some(vars)))
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(config.execution_provider, ExecutionProvider::Cpu);
        assert_eq!(config.intra_threads, 4);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.otel_endpoint.is_none());
        assert_eq!(config.detection.confidence_threshold, 0.5);
        assert_eq!(config.detection.max_results, 10);
        assert_eq!(
            config.detection.label_space,
            LabelSpace::Coco91,
            "Default model emits sparse COCO ids"
        );
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_with(&[
            ("GATEWAY_PORT", "8080"),
            ("GATEWAY_UPLOAD_DIR", "/tmp/gateway-uploads"),
            ("GATEWAY_EXECUTION_PROVIDER", "cuda"),
            ("GATEWAY_LOG_LEVEL", "debug"),
            ("GATEWAY_ENVIRONMENT", "production"),
            ("GATEWAY_OTEL_ENDPOINT", "http://collector:4317"),
            ("GATEWAY_DETECTION__CONFIDENCE_THRESHOLD", "0.7"),
            ("GATEWAY_DETECTION__MAX_RESULTS", "3"),
            ("GATEWAY_DETECTION__LABEL_SPACE", "contiguous"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/gateway-uploads"));
        assert_eq!(config.execution_provider, ExecutionProvider::Cuda);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.otel_endpoint.as_deref(), Some("http://collector:4317"));
        assert!((config.detection.confidence_threshold - 0.7).abs() < 1e-6);
        assert_eq!(config.detection.max_results, 3);
        assert_eq!(config.detection.label_space, LabelSpace::Contiguous);
    }

    #[test]
    fn test_unrelated_variables_ignored() {
        let config = load_with(&[("OTHER_PORT", "1"), ("PORT", "2")]).unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_invalid_value_is_error() {
        assert!(load_with(&[("GATEWAY_ENVIRONMENT", "staging")]).is_err());
        assert!(load_with(&[("GATEWAY_PORT", "not-a-port")]).is_err());
    }
}
