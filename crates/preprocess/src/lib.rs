//! Pixel-buffer to tensor conversions shared by the detector and the trainer.
//!
//! All functions take tightly packed RGB8 pixels in HWC order.

pub mod config;
pub mod cpu;

pub use config::{CLASSIFIER_INPUT_SIZE, IMAGENET_MEAN, IMAGENET_STD};
pub use cpu::{CpuPreProcessor, to_chw_tensor};
