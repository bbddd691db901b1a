use burn::record::RecorderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid dataset pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to walk dataset: {0}")]
    Walk(#[from] glob::GlobError),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to resize {}: {source}", path.display())]
    Resize {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Expected {expected} classes, found {}: {classes:?}", classes.len())]
    ClassCount {
        expected: usize,
        classes: Vec<String>,
    },

    #[error("No images found under {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("Failed to load pretrained weights: {0:?}")]
    Weights(RecorderError),

    #[error("Failed to save model: {0:?}")]
    Save(RecorderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        let err = TrainError::ClassCount {
            expected: 4,
            classes: vec!["glass".to_string(), "paper".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"Expected 4 classes, found 2: ["glass", "paper"]"#
        );

        let err = TrainError::EmptyDataset(PathBuf::from("dataset"));
        assert_eq!(err.to_string(), "No images found under dataset");
    }
}
