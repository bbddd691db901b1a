//! Fine-tunes an ImageNet-pretrained ResNet-18 on a folder of labelled images.

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod train;

pub use config::{TrainPaths, TrainingConfig};
pub use error::TrainError;
pub use model::ResNet18;
pub use train::train;

#[cfg(not(feature = "wgpu"))]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

#[cfg(feature = "wgpu")]
pub type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
