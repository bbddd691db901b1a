use burn::prelude::*;
use std::path::PathBuf;

pub const DATASET_DIR: &str = "dataset";
pub const PRETRAINED_WEIGHTS: &str = "weights/resnet18.pth";
pub const ARTIFACT_PATH: &str = "basura_classifier";

/// Hyperparameters of a training run.
#[derive(Config)]
pub struct TrainingConfig {
    #[config(default = 224)]
    pub image_size: usize,
    #[config(default = 32)]
    pub batch_size: usize,
    #[config(default = 5)]
    pub num_epochs: usize,
    #[config(default = 1.0e-3)]
    pub learning_rate: f64,
    #[config(default = 4)]
    pub num_classes: usize,
    #[config(default = 42)]
    pub seed: u64,
    #[config(default = 1)]
    pub num_workers: usize,
}

/// Where a run reads its inputs and writes its artifact.
#[derive(Debug, Clone)]
pub struct TrainPaths {
    pub dataset_dir: PathBuf,
    /// torchvision `state_dict`; `None` trains from random initialisation.
    pub pretrained_weights: Option<PathBuf>,
    /// Written with a `.mpk` extension.
    pub artifact: PathBuf,
}

impl Default for TrainPaths {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DATASET_DIR),
            pretrained_weights: Some(PathBuf::from(PRETRAINED_WEIGHTS)),
            artifact: PathBuf::from(ARTIFACT_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::new();

        assert_eq!(config.image_size, 224);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.num_epochs, 5);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.num_classes, 4);
    }

    #[test]
    fn test_builder_overrides() {
        let config = TrainingConfig::new().with_num_epochs(1).with_batch_size(2);
        assert_eq!(config.num_epochs, 1);
        assert_eq!(config.batch_size, 2);
    }

    #[test]
    fn test_default_paths() {
        let paths = TrainPaths::default();
        assert_eq!(paths.dataset_dir, PathBuf::from("dataset"));
        assert_eq!(
            paths.pretrained_weights,
            Some(PathBuf::from("weights/resnet18.pth"))
        );
        assert_eq!(paths.artifact, PathBuf::from("basura_classifier"));
    }
}
