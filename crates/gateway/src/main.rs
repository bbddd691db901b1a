use anyhow::Context;
use gateway::{AppState, build_router, config::get_configuration, logging::setup_logging};
use inference::{Detector, OrtBackend};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = get_configuration().context("failed to load configuration")?;
    let _telemetry = setup_logging(&config)?;

    tracing::info!(
        environment = config.environment.as_str(),
        model_path = %config.model_path,
        upload_dir = %config.upload_dir.display(),
        "Gateway starting"
    );

    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;

    let backend = OrtBackend::load_model_with_provider(
        &config.model_path,
        config.execution_provider,
        config.intra_threads,
    )
    .with_context(|| format!("failed to load detection model {}", config.model_path))?;
    let detector = Detector::new(backend, config.detection.clone());

    let state = AppState::new(Arc::new(detector), config.upload_dir.clone());
    let app = build_router(state, config.max_upload_bytes);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("HTTP server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
