//! JPEG encoding at an explicit quality.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageResult, RgbImage};

/// Encode `image` as baseline JPEG at `quality` (1..=100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    image.write_with_encoder(encoder)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn noisy(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(73) ^ y.wrapping_mul(151) ^ (x * y);
            Rgb([v as u8, (v >> 3) as u8, (v >> 5) as u8])
        })
    }

    #[test]
    fn test_output_is_jpeg() {
        let bytes = encode_jpeg(&noisy(32, 32), 80).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_lower_quality_is_smaller() {
        let img = noisy(128, 128);
        let high = encode_jpeg(&img, 95).unwrap();
        let low = encode_jpeg(&img, 15).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let img = noisy(64, 64);
        assert_eq!(encode_jpeg(&img, 70).unwrap(), encode_jpeg(&img, 70).unwrap());
    }
}
