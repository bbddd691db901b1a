use burn::backend::{Autodiff, NdArray};
use image::{Rgb, RgbImage};
use std::path::Path;
use trainer::{TrainError, TrainPaths, TrainingConfig, train};

type TestBackend = Autodiff<NdArray>;

const IMAGE_SIZE: usize = 32;

/// Create `root/<class>/<n>.png` with a distinct flat colour per class
fn build_dataset(root: &Path, classes: &[&str], images_per_class: usize) {
    for (index, class) in classes.iter().enumerate() {
        let dir = root.join(class);
        std::fs::create_dir_all(&dir).unwrap();
        let shade = (index * 60) as u8;
        for n in 0..images_per_class {
            RgbImage::from_pixel(20, 16, Rgb([shade, 255 - shade, (n * 40) as u8]))
                .save(dir.join(format!("{}.png", n)))
                .unwrap();
        }
    }
}

fn tiny_config() -> TrainingConfig {
    TrainingConfig::new()
        .with_image_size(IMAGE_SIZE)
        .with_batch_size(4)
        .with_num_epochs(1)
}

fn paths_for(root: &Path) -> TrainPaths {
    TrainPaths {
        dataset_dir: root.join("dataset"),
        pretrained_weights: None,
        artifact: root.join("classifier"),
    }
}

#[test]
fn test_short_training_writes_artifact() {
    let workspace = tempfile::tempdir().unwrap();
    let paths = paths_for(workspace.path());
    build_dataset(&paths.dataset_dir, &["cardboard", "glass", "metal", "plastic"], 2);

    let artifact = train::<TestBackend>(&tiny_config(), &paths, &Default::default()).unwrap();

    assert_eq!(artifact, workspace.path().join("classifier.mpk"));
    let metadata = std::fs::metadata(&artifact).unwrap();
    assert!(metadata.len() > 0, "Artifact should not be empty");
}

#[test]
fn test_wrong_class_count_rejected() {
    let workspace = tempfile::tempdir().unwrap();
    let paths = paths_for(workspace.path());
    build_dataset(&paths.dataset_dir, &["glass", "metal", "paper"], 1);

    let result = train::<TestBackend>(&tiny_config(), &paths, &Default::default());

    match result {
        Err(TrainError::ClassCount { expected, classes }) => {
            assert_eq!(expected, 4);
            assert_eq!(classes, ["glass", "metal", "paper"]);
        }
        other => panic!("Expected ClassCount error, got {:?}", other),
    }
    assert!(!workspace.path().join("classifier.mpk").exists());
}

#[test]
fn test_empty_dataset_rejected() {
    let workspace = tempfile::tempdir().unwrap();
    let paths = paths_for(workspace.path());
    build_dataset(&paths.dataset_dir, &["a", "b", "c", "d"], 0);

    let result = train::<TestBackend>(&tiny_config(), &paths, &Default::default());

    assert!(matches!(result, Err(TrainError::EmptyDataset(_))), "{:?}", result);
    assert!(!workspace.path().join("classifier.mpk").exists());
}

#[test]
fn test_missing_dataset_dir_is_io_error() {
    let workspace = tempfile::tempdir().unwrap();
    let paths = paths_for(workspace.path());

    let result = train::<TestBackend>(&tiny_config(), &paths, &Default::default());

    assert!(matches!(result, Err(TrainError::Io(_))), "{:?}", result);
}
