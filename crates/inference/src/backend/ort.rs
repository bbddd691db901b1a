use super::{InferenceBackend, InferenceOutput};
use ndarray::{Array, IxDyn};
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use serde::Deserialize;

/// Tensor names of a torchvision detection model exported with
/// `input_names=["images"], output_names=["boxes", "labels", "scores"]`.
const INPUT_IMAGES: &str = "images";
const OUTPUT_LABELS: &str = "labels";
const OUTPUT_SCORES: &str = "scores";

pub const DEFAULT_INTRA_THREADS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionProvider {
    #[default]
    Cpu,
    Cuda,
}

pub struct OrtBackend {
    session: Session,
}

impl OrtBackend {
    /// Load model with specified execution provider
    pub fn load_model_with_provider(
        path: &str,
        provider: ExecutionProvider,
        intra_threads: usize,
    ) -> anyhow::Result<Self> {
        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?;

        match provider {
            ExecutionProvider::Cuda => {
                tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                builder = builder.with_execution_providers([
                    ort::execution_providers::CUDAExecutionProvider::default()
                        .with_device_id(0)
                        .build()
                        .error_on_failure(),
                ])?;
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(path)?;

        tracing::info!(path, intra_threads, "Detection model loaded");
        Ok(Self { session })
    }
}

impl InferenceBackend for OrtBackend {
    fn load_model(path: &str) -> anyhow::Result<Self> {
        Self::load_model_with_provider(path, ExecutionProvider::Cpu, DEFAULT_INTRA_THREADS)
    }

    fn infer(&mut self, image: &Array<f32, IxDyn>) -> anyhow::Result<InferenceOutput> {
        let outputs = self.session.run(ort::inputs![
            INPUT_IMAGES => TensorRef::from_array_view(image.view())?
        ])?;

        let labels = outputs[OUTPUT_LABELS].try_extract_array::<i64>()?;
        let scores = outputs[OUTPUT_SCORES].try_extract_array::<f32>()?;

        Ok(InferenceOutput {
            labels: labels.into_owned(),
            scores: scores.into_owned(),
        })
    }
}
