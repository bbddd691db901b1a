use crate::{
    backend::InferenceBackend,
    config::DetectOptions,
    error::DetectError,
    postprocessing::{PostProcessor, Prediction},
};
use common::span;
use image::ImageReader;
use preprocess::to_chw_tensor;
use std::path::Path;
use std::sync::Mutex;

/// Anything that can turn a stored image into a ranked prediction list.
///
/// The HTTP layer only sees this trait, so handlers can be exercised
/// without a real model.
pub trait Predictor: Send + Sync {
    fn predict(&self, path: &Path) -> Result<Vec<Prediction>, DetectError>;
}

/// Detection routine over a model loaded once at startup.
///
/// Backends need exclusive access for a forward pass, so concurrent callers
/// serialize on the inner lock; decoding and tensor conversion run outside it.
pub struct Detector<B: InferenceBackend> {
    backend: Mutex<B>,
    options: DetectOptions,
}

impl<B: InferenceBackend> Detector<B> {
    pub fn new(backend: B, options: DetectOptions) -> Self {
        tracing::info!(
            confidence_threshold = options.confidence_threshold,
            max_results = options.max_results,
            label_space = ?options.label_space,
            "Detector ready"
        );
        Self {
            backend: Mutex::new(backend),
            options,
        }
    }

    pub fn options(&self) -> &DetectOptions {
        &self.options
    }

    /// Detect objects in the image stored at `path` using the configured options.
    pub fn detect_file(&self, path: &Path) -> Result<Vec<Prediction>, DetectError> {
        self.detect_file_with(path, &self.options)
    }

    /// Same as [`Self::detect_file`] with caller-supplied options.
    #[tracing::instrument(skip(self, path, options), fields(path = %path.display()))]
    pub fn detect_file_with(
        &self,
        path: &Path,
        options: &DetectOptions,
    ) -> Result<Vec<Prediction>, DetectError> {
        let rgb = {
            let _s = span!("decode_image");
            ImageReader::open(path)?
                .with_guessed_format()?
                .decode()?
                .to_rgb8()
        };
        let (width, height) = rgb.dimensions();

        let tensor = to_chw_tensor(rgb.as_raw(), width, height).map_err(DetectError::Preprocess)?;

        let output = {
            let _s = span!("model_inference");
            let mut backend = self
                .backend
                .lock()
                .map_err(|_| DetectError::BackendPoisoned)?;
            backend.infer(&tensor).map_err(DetectError::Inference)?
        };

        let predictions = PostProcessor::new(options)
            .select(&output.labels.view(), &output.scores.view())?;

        tracing::debug!(width, height, count = predictions.len(), "Detection complete");
        Ok(predictions)
    }
}

impl<B: InferenceBackend + Send> Predictor for Detector<B> {
    fn predict(&self, path: &Path) -> Result<Vec<Prediction>, DetectError> {
        self.detect_file(path)
    }
}
