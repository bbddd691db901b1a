use crate::error::TrainError;
use burn::{data::dataloader::batcher::Batcher, data::dataset::Dataset, prelude::*};
use preprocess::{CpuPreProcessor, IMAGENET_MEAN, IMAGENET_STD};
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "ppm", "bmp", "pgm", "tif", "tiff", "webp",
];

/// One decoded training sample: packed RGB8 at the dataset's image size.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub pixels: Vec<u8>,
    pub label: usize,
}

/// Labelled images laid out as `root/<class>/**/<image>`.
///
/// Classes are the sorted subdirectory names and label `i` is the `i`-th
/// class. Everything is decoded and resized up front and kept in memory.
#[derive(Debug)]
pub struct ImageFolder {
    classes: Vec<String>,
    items: Vec<ImageItem>,
    image_size: usize,
}

impl ImageFolder {
    pub fn load(root: &Path, image_size: usize) -> Result<Self, TrainError> {
        let classes = class_names(root)?;
        let side = image_size as u32;
        let mut resizer = CpuPreProcessor::new((side, side));
        let mut items = Vec::new();

        for (label, class) in classes.iter().enumerate() {
            let files = image_files(&root.join(class))?;
            tracing::debug!(class = %class, label, images = files.len(), "Loading class");

            for path in files {
                let rgb = image::open(&path)
                    .map_err(|source| TrainError::Decode {
                        path: path.clone(),
                        source,
                    })?
                    .to_rgb8();
                let (width, height) = rgb.dimensions();
                let pixels = resizer
                    .resize_exact(rgb.as_raw(), width, height)
                    .map_err(|source| TrainError::Resize { path, source })?;

                items.push(ImageItem { pixels, label });
            }
        }

        tracing::info!(
            root = %root.display(),
            classes = ?classes,
            images = items.len(),
            "Dataset loaded"
        );

        Ok(Self {
            classes,
            items,
            image_size,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn image_size(&self) -> usize {
        self.image_size
    }
}

impl Dataset<ImageItem> for ImageFolder {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn class_names(root: &Path) -> Result<Vec<String>, TrainError> {
    let mut classes = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| TrainError::NonUtf8Path(entry.path()))?;
            classes.push(name);
        }
    }
    classes.sort();
    Ok(classes)
}

/// Every file below `dir` with an image extension, in sorted path order.
fn image_files(dir: &Path) -> Result<Vec<PathBuf>, TrainError> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| TrainError::NonUtf8Path(dir.to_path_buf()))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(dir_str));

    let mut files = Vec::new();
    for path in glob::glob(&pattern)? {
        let path = path?;
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
}

#[derive(Clone, Debug)]
pub struct ImageBatch<B: Backend> {
    pub images: Tensor<B, 4>,
    pub targets: Tensor<B, 1, Int>,
}

/// Stacks items into `[N, 3, H, W]` ImageNet-normalised images and `[N]` targets.
#[derive(Clone)]
pub struct ImageBatcher<B: Backend> {
    device: B::Device,
    image_size: usize,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device, image_size: usize) -> Self {
        Self { device, image_size }
    }
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        let batch_size = items.len();
        let side = self.image_size;

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|item| item.pixels.iter().map(|&value| value as f32))
            .collect();
        let targets: Vec<i64> = items.iter().map(|item| item.label as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, [batch_size, side, side, 3]),
            &self.device,
        )
        .permute([0, 3, 1, 2])
            / 255.0;

        let mean = Tensor::<B, 1>::from_floats(IMAGENET_MEAN, &self.device).reshape([1, 3, 1, 1]);
        let std_dev = Tensor::<B, 1>::from_floats(IMAGENET_STD, &self.device).reshape([1, 3, 1, 1]);

        let targets =
            Tensor::<B, 1, Int>::from_data(TensorData::new(targets, [batch_size]), &self.device);

        ImageBatch {
            images: (images - mean) / std_dev,
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use image::{Rgb, RgbImage};

    type TestBackend = NdArray;

    fn write_image(path: &Path, colour: [u8; 3]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbImage::from_pixel(10, 6, Rgb(colour)).save(path).unwrap();
    }

    #[test]
    fn test_load_sorted_classes_and_labels() {
        let root = tempfile::tempdir().unwrap();
        write_image(&root.path().join("plastic/a.png"), [0, 0, 255]);
        write_image(&root.path().join("glass/one.png"), [255, 0, 0]);
        write_image(&root.path().join("glass/nested/two.JPG"), [255, 0, 0]);
        write_image(&root.path().join("paper/p.bmp"), [0, 255, 0]);
        std::fs::write(root.path().join("paper/notes.txt"), b"not an image").unwrap();
        std::fs::write(root.path().join("README.md"), b"top-level file").unwrap();

        let folder = ImageFolder::load(root.path(), 8).unwrap();

        assert_eq!(folder.classes(), ["glass", "paper", "plastic"]);
        assert_eq!(folder.len(), 4);

        let labels: Vec<_> = (0..folder.len())
            .map(|i| folder.get(i).unwrap().label)
            .collect();
        assert_eq!(labels, [0, 0, 1, 2]);

        let item = folder.get(0).unwrap();
        assert_eq!(item.pixels.len(), 8 * 8 * 3, "Resized to image_size");
        assert!(folder.get(4).is_none());
    }

    #[test]
    fn test_corrupt_image_aborts_load() {
        let root = tempfile::tempdir().unwrap();
        write_image(&root.path().join("glass/ok.png"), [1, 2, 3]);
        std::fs::create_dir_all(root.path().join("metal")).unwrap();
        std::fs::write(root.path().join("metal/broken.jpg"), b"definitely not a jpeg").unwrap();

        let result = ImageFolder::load(root.path(), 8);

        assert!(matches!(result, Err(TrainError::Decode { .. })), "{:?}", result);
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let result = ImageFolder::load(&root.path().join("absent"), 8);
        assert!(matches!(result, Err(TrainError::Io(_))));
    }

    #[test]
    fn test_extension_filter() {
        assert!(has_image_extension(Path::new("a/b.jpeg")));
        assert!(has_image_extension(Path::new("a/b.TIFF")));
        assert!(has_image_extension(Path::new("b.webp")));
        assert!(!has_image_extension(Path::new("b.gif")));
        assert!(!has_image_extension(Path::new("jpg")));
    }

    #[test]
    fn test_batcher_shapes_and_normalisation() {
        let device = Default::default();
        let batcher = ImageBatcher::<TestBackend>::new(device, 2);

        let items = vec![
            ImageItem {
                pixels: vec![255; 2 * 2 * 3],
                label: 3,
            },
            ImageItem {
                pixels: vec![0; 2 * 2 * 3],
                label: 1,
            },
        ];

        let batch = batcher.batch(items);

        assert_eq!(batch.images.dims(), [2, 3, 2, 2]);
        assert_eq!(batch.targets.dims(), [2]);

        let targets: Vec<i64> = batch.targets.into_data().convert::<i64>().to_vec().unwrap();
        assert_eq!(targets, [3, 1]);

        let values: Vec<f32> = batch.images.into_data().convert::<f32>().to_vec().unwrap();
        let white_red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let black_blue = (0.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];
        assert!((values[0] - white_red).abs() < 1e-4, "got {}", values[0]);
        assert!((values[23] - black_blue).abs() < 1e-4, "got {}", values[23]);
    }
}
