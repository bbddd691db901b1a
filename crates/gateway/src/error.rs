use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::io;
use thiserror::Error;

/// Failure of a `/predict` request.
///
/// The display text is exactly what clients receive in `{"error": ...}`;
/// wrapped causes are only logged.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No image file provided")]
    MissingImage,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Malformed multipart body")]
    MalformedUpload(#[source] MultipartError),

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Failed to store upload")]
    StorageFailed(#[source] io::Error),

    #[error("Prediction failed")]
    PredictionFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::InvalidFileType | ApiError::MalformedUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::StorageFailed(_) | ApiError::PredictionFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::MalformedUpload(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::MalformedUpload(e) => {
                tracing::warn!(error = %e, "Rejected malformed multipart body")
            }
            ApiError::StorageFailed(e) => tracing::error!(error = %e, "Failed to store upload"),
            ApiError::PredictionFailed(detail) => {
                tracing::error!(error = %detail, "Prediction failed")
            }
            other => tracing::debug!(error = %other, "Rejected prediction request"),
        }

        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
