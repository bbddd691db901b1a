use crate::config::CLASSIFIER_INPUT_SIZE;
use common::span;
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use ndarray::{Array, IxDyn};

fn check_rgb_buffer(pixels: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if width == 0 || height == 0 {
        anyhow::bail!("Empty image: {}x{}", width, height);
    }

    let expected_size = width as usize * height as usize * 3;
    if pixels.len() != expected_size {
        anyhow::bail!(
            "Buffer size mismatch: expected {}, got {} bytes",
            expected_size,
            pixels.len()
        );
    }

    Ok(())
}

/// Converts RGB8 pixels into a `[3, H, W]` tensor scaled to `[0, 1]`.
///
/// This is the plain "to tensor" conversion: no resize, no mean/std
/// normalisation. Detection models exported with their own transform
/// expect exactly this.
pub fn to_chw_tensor(pixels: &[u8], width: u32, height: u32) -> anyhow::Result<Array<f32, IxDyn>> {
    let _s = span!("to_chw_tensor");

    check_rgb_buffer(pixels, width, height)?;

    let spatial = width as usize * height as usize;
    let mut output = vec![0.0f32; 3 * spatial];

    for (i, px) in pixels.chunks_exact(3).enumerate() {
        output[i] = px[0] as f32 / 255.0;
        output[i + spatial] = px[1] as f32 / 255.0;
        output[i + 2 * spatial] = px[2] as f32 / 255.0;
    }

    Ok(Array::from_shape_vec(
        IxDyn(&[3, height as usize, width as usize]),
        output,
    )?)
}

/// Classifier input sizing: exact (aspect-ratio ignoring) bilinear resize
/// to `input_size`. Normalisation happens on the batched tensor.
pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
    resizer: Resizer,
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self {
            input_size,
            resizer: Resizer::new(),
        }
    }

    /// Resizes to `input_size`, returning packed RGB8 pixels.
    pub fn resize_exact(&mut self, pixels: &[u8], width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
        let _s = span!("resize_exact");

        check_rgb_buffer(pixels, width, height)?;

        let src = ImageRef::new(width, height, pixels, PixelType::U8x3)?;
        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        self.resizer.resize(
            &src,
            &mut resized,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )?;

        Ok(resized.buffer().to_vec())
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(CLASSIFIER_INPUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test plain tensor conversion keeps layout and scales to [0, 1]
    #[test]
    fn test_to_chw_tensor_layout() {
        let pixels = vec![
            255, 0, 0, // Red pixel
            0, 255, 0, // Green pixel
            0, 0, 255, // Blue pixel
            255, 255, 255, // White pixel
        ];

        let output = to_chw_tensor(&pixels, 2, 2).unwrap();

        assert_eq!(output.shape(), &[3, 2, 2]);
        assert_eq!(output[[0, 0, 0]], 1.0, "Red channel of red pixel");
        assert_eq!(output[[1, 0, 0]], 0.0, "Green channel of red pixel");
        assert_eq!(output[[1, 0, 1]], 1.0, "Green channel of green pixel");
        assert_eq!(output[[2, 1, 0]], 1.0, "Blue channel of blue pixel");
        for c in 0..3 {
            assert_eq!(output[[c, 1, 1]], 1.0, "White pixel is 1.0 in every channel");
        }
    }

    /// Test non-square images keep their height/width order
    #[test]
    fn test_to_chw_tensor_non_square() {
        let pixels = vec![64u8; 5 * 3 * 3];
        let output = to_chw_tensor(&pixels, 5, 3).unwrap();

        assert_eq!(output.shape(), &[3, 3, 5]);
        assert!((output[[2, 2, 4]] - 64.0 / 255.0).abs() < 1e-6);
    }

    /// Test buffer size mismatch detection
    #[test]
    fn test_buffer_size_mismatch_detection() {
        let pixels = vec![0u8; 200]; // Wrong size for 10x10

        let result = to_chw_tensor(&pixels, 10, 10);

        assert!(result.is_err(), "Size mismatch should return error");
        assert!(
            result.unwrap_err().to_string().contains("mismatch"),
            "Error should mention mismatch"
        );
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        assert!(to_chw_tensor(&[], 0, 0).is_err());
        assert!(CpuPreProcessor::default().resize_exact(&[], 0, 4).is_err());
    }

    /// Test exact resize ignores aspect ratio
    #[test]
    fn test_resize_exact_output_size() {
        let pixels = vec![128u8; 800 * 600 * 3];

        let mut preprocessor = CpuPreProcessor::default();
        let resized = preprocessor.resize_exact(&pixels, 800, 600).unwrap();

        assert_eq!(resized.len(), 224 * 224 * 3);
        assert!(
            resized.iter().all(|&v| v.abs_diff(128) <= 1),
            "Resizing a flat image should keep its colour"
        );
    }

    #[test]
    fn test_resize_exact_custom_size() {
        let pixels = vec![10u8; 6 * 2 * 3];

        let mut preprocessor = CpuPreProcessor::new((3, 5));
        let resized = preprocessor.resize_exact(&pixels, 6, 2).unwrap();

        assert_eq!(resized.len(), 3 * 5 * 3, "Packed RGB8 at the target size");
    }
}
