use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Preprocessing failed: {0}")]
    Preprocess(anyhow::Error),

    #[error("Inference failed: {0}")]
    Inference(anyhow::Error),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Inference backend lock poisoned")]
    BackendPoisoned,
}
