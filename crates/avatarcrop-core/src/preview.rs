//! Circular profile preview.
//!
//! The cropper shows the selection through a round window. The mask is
//! applied to a copy for display only; committed output stays rectangular.

use crate::decode::{RasterImage, CHANNELS};

/// Smootherstep interpolation: `6t^5 - 15t^4 + 10t^3`, input clamped to 0..1.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Coverage of the pixel centered at `(px, py)` by the ellipse inscribed in
/// a `width` x `height` box. Ramps from 0 to 1 across one pixel at the edge.
fn ellipse_coverage(px: f64, py: f64, width: f64, height: f64) -> f64 {
    let (rx, ry) = (width / 2.0, height / 2.0);
    let dx = (px - rx) / rx;
    let dy = (py - ry) / ry;
    let distance = (dx * dx + dy * dy).sqrt();

    // Approximate signed distance to the edge in pixels
    let inside = (1.0 - distance) * rx.min(ry);
    smootherstep(inside + 0.5)
}

/// Copy of `image` with pixels outside the inscribed ellipse made transparent.
///
/// Alpha is scaled by coverage, so the edge is smoothed over about one pixel.
/// A square input gives a circle.
pub fn round_preview(image: &RasterImage) -> RasterImage {
    let (width, height) = (image.width, image.height);
    let mut pixels = image.pixels.clone();

    for y in 0..height as usize {
        for x in 0..width as usize {
            let coverage =
                ellipse_coverage(x as f64 + 0.5, y as f64 + 0.5, width as f64, height as f64);
            if coverage >= 1.0 {
                continue;
            }
            let idx = (y * width as usize + x) * CHANNELS + 3;
            if let Some(alpha) = pixels.get_mut(idx) {
                *alpha = (*alpha as f64 * coverage).round() as u8;
            }
        }
    }

    RasterImage {
        width,
        height,
        pixels,
    }
}
