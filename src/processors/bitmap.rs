//! Decoding embedded bitmap bytes into RGB images.

use crate::core::ClassifyError;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Decodes BMP bytes (for example from `include_bytes!`) into an RGB image.
///
/// # Errors
///
/// Returns `ClassifyError::ImageDecode` if the bytes are not a valid BMP.
pub fn decode_bmp(bytes: &[u8]) -> Result<RgbImage, ClassifyError> {
    let img = image::load(Cursor::new(bytes), ImageFormat::Bmp)?;
    Ok(img.to_rgb8())
}

/// Decodes image bytes of any supported format, guessing the format from the
/// content.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ClassifyError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn encode_bmp(img: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Bmp)
            .expect("bmp encode");
        bytes
    }

    #[test]
    fn test_decode_bmp_round_trips_pixels() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(3, 1, Rgb([0, 0, 255]));

        let decoded = decode_bmp(&encode_bmp(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(decoded.get_pixel(3, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_decode_bmp_rejects_garbage() {
        assert!(decode_bmp(b"definitely not a bitmap").is_err());
    }

    #[test]
    fn test_decode_image_guesses_format() {
        let img = RgbImage::new(2, 2);
        let decoded = decode_image(&encode_bmp(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
    }
}
