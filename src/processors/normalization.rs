//! Image normalization into model input tensors.
//!
//! Converts 8-bit RGB pixels into NCHW float tensors using per-channel
//! `alpha * value + beta` affine normalization, where `alpha = scale / std`
//! and `beta = -mean / std`.

use crate::core::{ClassifyError, Tensor4D};
use image::RgbImage;
use rayon::prelude::*;

/// Normalizes RGB images into CHW float tensors.
#[derive(Debug)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    pub alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    pub beta: Vec<f32>,
}

impl NormalizeImage {
    /// Creates a normalizer with the given scale, per-channel mean and std.
    ///
    /// Defaults when `None`: scale 1/255, ImageNet mean `[0.485, 0.456,
    /// 0.406]` and std `[0.229, 0.224, 0.225]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the scale is non-positive, the mean
    /// or std do not have exactly 3 elements, or any std is non-positive.
    pub fn new(
        scale: Option<f32>,
        mean: Option<Vec<f32>>,
        std: Option<Vec<f32>>,
    ) -> Result<Self, ClassifyError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or_else(|| vec![0.485, 0.456, 0.406]);
        let std = std.unwrap_or_else(|| vec![0.229, 0.224, 0.225]);

        if scale <= 0.0 {
            return Err(ClassifyError::config_error("Scale must be greater than 0"));
        }
        if mean.len() != 3 {
            return Err(ClassifyError::config_error(
                "Mean must have exactly 3 elements for RGB",
            ));
        }
        if std.len() != 3 {
            return Err(ClassifyError::config_error(
                "Std must have exactly 3 elements for RGB",
            ));
        }
        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifyError::config_error(format!(
                    "Standard deviation at index {i} must be greater than 0, got {s}"
                )));
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        Ok(Self { alpha, beta })
    }

    /// Creates a normalizer that only rescales pixels to `[0, 1]`, with no
    /// mean/std adjustment.
    pub fn unit_scale() -> Result<Self, ClassifyError> {
        Self::new(
            Some(1.0 / 255.0),
            Some(vec![0.0, 0.0, 0.0]),
            Some(vec![1.0, 1.0, 1.0]),
        )
    }

    /// Normalizes a single image into a `[1, 3, H, W]` tensor.
    pub fn normalize_to(&self, img: &RgbImage) -> Result<Tensor4D, ClassifyError> {
        self.normalize_batch_to(std::slice::from_ref(img))
    }

    /// Normalizes a batch of same-sized images into a `[N, 3, H, W]` tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if images in the batch differ in dimensions.
    pub fn normalize_batch_to(&self, imgs: &[RgbImage]) -> Result<Tensor4D, ClassifyError> {
        if imgs.is_empty() {
            return Ok(ndarray::Array4::zeros((0, 0, 0, 0)));
        }

        let batch_size = imgs.len();
        let (width, height) = imgs[0].dimensions();
        for (i, img) in imgs.iter().enumerate() {
            let (w, h) = img.dimensions();
            if w != width || h != height {
                return Err(ClassifyError::invalid_input(format!(
                    "All images in batch must have the same dimensions. Image 0: {width}x{height}, Image {i}: {w}x{h}"
                )));
            }
        }

        let channels = 3usize;
        let img_size = channels * height as usize * width as usize;
        let mut result = vec![0.0f32; batch_size * img_size];

        let fill = |batch_idx: usize, batch_slice: &mut [f32]| {
            let rgb_img = &imgs[batch_idx];
            for c in 0..channels {
                for y in 0..height {
                    for x in 0..width {
                        let pixel = rgb_img.get_pixel(x, y);
                        let channel_value = pixel[c] as f32;
                        let dst_idx = c * (height * width) as usize
                            + (y * width + x) as usize;
                        batch_slice[dst_idx] = channel_value * self.alpha[c] + self.beta[c];
                    }
                }
            }
        };

        if batch_size <= 1 {
            // Avoid rayon overhead for single-image batches
            fill(0, &mut result[0..img_size]);
        } else {
            result
                .par_chunks_mut(img_size)
                .enumerate()
                .for_each(|(batch_idx, batch_slice)| fill(batch_idx, batch_slice));
        }

        ndarray::Array4::from_shape_vec(
            (batch_size, channels, height as usize, width as usize),
            result,
        )
        .map_err(|e| {
            ClassifyError::tensor_operation("Failed to create batch normalization tensor", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(NormalizeImage::new(Some(0.0), None, None).is_err());
        assert!(NormalizeImage::new(None, Some(vec![0.5, 0.5]), None).is_err());
        assert!(NormalizeImage::new(None, None, Some(vec![0.1, 0.0, 0.1])).is_err());
    }

    #[test]
    fn test_unit_scale_maps_to_unit_interval() {
        let norm = NormalizeImage::unit_scale().unwrap();
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 51]));

        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 1, 1]);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(tensor[[0, 1, 0, 0]], 0.0);
        assert!((tensor[[0, 2, 0, 0]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_is_chw() {
        let norm = NormalizeImage::unit_scale().unwrap();
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));

        let tensor = norm.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 1, 2]);
        // red channel plane: [1.0, 0.0], green plane: [0.0, 1.0]
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 1e-6);
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert_eq!(tensor[[0, 1, 0, 0]], 0.0);
        assert!((tensor[[0, 1, 0, 1]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_batch_rejects_mismatched_dimensions() {
        let norm = NormalizeImage::unit_scale().unwrap();
        let imgs = vec![RgbImage::new(2, 2), RgbImage::new(3, 2)];
        assert!(norm.normalize_batch_to(&imgs).is_err());
    }

    #[test]
    fn test_batch_stacks_images() {
        let norm = NormalizeImage::unit_scale().unwrap();
        let imgs = vec![RgbImage::new(4, 4), RgbImage::new(4, 4), RgbImage::new(4, 4)];
        let tensor = norm.normalize_batch_to(&imgs).unwrap();
        assert_eq!(tensor.shape(), &[3, 3, 4, 4]);
    }

    #[test]
    fn test_empty_batch() {
        let norm = NormalizeImage::unit_scale().unwrap();
        let tensor = norm.normalize_batch_to(&[]).unwrap();
        assert_eq!(tensor.shape(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_imagenet_defaults() {
        let norm = NormalizeImage::new(None, None, None).unwrap();
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([124, 116, 104]));

        let tensor = norm.normalize_to(&img).unwrap();
        // 124/255 ~ 0.486 ~ ImageNet red mean, so the value is near zero
        assert!(tensor[[0, 0, 0, 0]].abs() < 0.02);
    }
}
