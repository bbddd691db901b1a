use crate::config::Config;
use common::TelemetryGuard;

pub const SERVICE_NAME: &str = "gateway";

/// Installs the tracing subscriber for the gateway.
///
/// With an OTLP endpoint configured the returned guard owns the exporters and
/// must be kept alive until shutdown; otherwise plain console logging is set up.
pub fn setup_logging(config: &Config) -> anyhow::Result<Option<TelemetryGuard>> {
    match config.otel_endpoint.as_deref() {
        Some(endpoint) => Ok(Some(TelemetryGuard::init(
            SERVICE_NAME,
            endpoint,
            config.log_level,
            config.environment,
        )?)),
        None => {
            common::setup_logging(config.log_level, config.environment);
            Ok(None)
        }
    }
}
