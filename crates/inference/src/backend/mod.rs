use ndarray::{Array, IxDyn};

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded detection model.
///
/// Implementations are loaded once at startup and reused for every request.
pub trait InferenceBackend {
    fn load_model(path: &str) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run a single forward pass.
    ///
    /// `image` is a `[3, H, W]` tensor with values in `[0, 1]`; the model is
    /// expected to resize and normalise internally.
    fn infer(&mut self, image: &Array<f32, IxDyn>) -> anyhow::Result<InferenceOutput>;
}

pub struct InferenceOutput {
    pub labels: ndarray::ArrayD<i64>, // [N] class ids, one per instance
    pub scores: ndarray::ArrayD<f32>, // [N] confidences in [0, 1]
}
