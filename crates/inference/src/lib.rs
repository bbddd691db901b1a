pub mod backend;
pub mod config;
pub mod detector;
pub mod error;
pub mod labels;
pub mod postprocessing;

// Re-export commonly used types for convenience
pub use backend::{InferenceBackend, InferenceOutput};
#[cfg(feature = "ort-backend")]
pub use backend::ort::{ExecutionProvider, OrtBackend};
pub use config::DetectOptions;
pub use detector::{Detector, Predictor};
pub use error::DetectError;
pub use labels::LabelSpace;
pub use postprocessing::{PostProcessor, Prediction};
