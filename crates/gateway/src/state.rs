use crate::metrics::PredictionMetrics;
use inference::Predictor;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
    pub upload_dir: Arc<PathBuf>,
    pub metrics: PredictionMetrics,
}

impl AppState {
    pub fn new(predictor: Arc<dyn Predictor>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            predictor,
            upload_dir: Arc::new(upload_dir.into()),
            metrics: PredictionMetrics::new(),
        }
    }
}
