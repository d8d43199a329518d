//! Floating-point bilinear reference
//!
//! Output pixel `(n, m)` samples the source at `(n * step, m * step)`,
//! interpolating between the four surrounding pixels. The output size is
//! `floor(width / step) x floor(height / step)`. Neighbours past the last
//! row or column are clamped to it.

use crate::error::TestResult;
use streamscale_core::GrayImage;

/// Bilinear sample of `image` at real coordinates `(x, y)`.
pub fn sample(image: &GrayImage, x: f64, y: f64) -> f64 {
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;
    let x0 = (x.floor() as u32).min(max_x);
    let y0 = (y.floor() as u32).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = x - f64::from(x0);
    let fy = y - f64::from(y0);

    let p = |px, py| f64::from(image.get_unchecked(px, py));
    let top = p(x0, y0) * (1.0 - fx) + p(x1, y0) * fx;
    let bottom = p(x0, y1) * (1.0 - fx) + p(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Downscale `image` by `step` source pixels per output pixel.
///
/// # Errors
///
/// Fails if the output would be empty.
pub fn resize_bilinear(image: &GrayImage, step: f64) -> TestResult<GrayImage> {
    let new_width = (f64::from(image.width()) / step).floor() as u32;
    let new_height = (f64::from(image.height()) / step).floor() as u32;
    Ok(GrayImage::from_fn(new_width, new_height, |n, m| {
        let v = sample(image, f64::from(n) * step, f64::from(m) * step);
        v.round().clamp(0.0, 255.0) as u8
    })?)
}
