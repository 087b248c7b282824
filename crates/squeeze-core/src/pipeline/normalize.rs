//! Flatten transparency and convert to 8-bit RGB for JPEG encoding.

use image::{DynamicImage, Rgb, RgbImage};

/// Prepare a decoded image for a lossy, opaque encoder.
///
/// Images with an alpha channel are composited over `background`; the
/// result is always three-channel 8-bit.
pub fn normalize(image: DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([
            blend(r, background[0], a),
            blend(g, background[1], a),
            blend(b, background[2], a),
        ])
    })
}

// Rounded fg * a + bg * (1 - a) in 0..=255 fixed point.
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    let v = u32::from(fg) * a + u32::from(bg) * (255 - a);
    ((v + 127) / 255) as u8
}
