use crate::{
    error::ApiError,
    metrics::Outcome,
    state::AppState,
    upload::receive_image,
};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    routing::{get, post},
};
use inference::Prediction;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub const RUNNING_MESSAGE: &str = "Object Recognition Backend is Running!";

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Prediction>,
}

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    RUNNING_MESSAGE
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let started = Instant::now();
    let result = handle_predict(&state, multipart).await;

    let outcome = match &result {
        Ok(_) => Outcome::Success,
        Err(e) if e.is_client_error() => Outcome::Rejected,
        Err(_) => Outcome::Failed,
    };
    state.metrics.record(outcome, started.elapsed());

    result.map(Json)
}

async fn handle_predict(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PredictResponse, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Request is not multipart");
        ApiError::MissingImage
    })?;

    let upload = receive_image(&mut multipart, &state.upload_dir).await?;

    // The guard moves into the task so the file is removed even if detection panics.
    let predictor = state.predictor.clone();
    let predictions = tokio::task::spawn_blocking(move || {
        let result = predictor.predict(upload.path());
        drop(upload);
        result
    })
    .await
    .map_err(|e| ApiError::PredictionFailed(format!("detection task aborted: {}", e)))?
    .map_err(|e| ApiError::PredictionFailed(e.to_string()))?;

    tracing::info!(count = predictions.len(), "Prediction served");
    Ok(PredictResponse { predictions })
}
