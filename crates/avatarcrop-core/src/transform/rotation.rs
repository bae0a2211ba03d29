//! Rotation about the image center onto an expanded, transparent canvas.
//!
//! Quarter turns are exact index remaps. Any other angle uses inverse
//! mapping: for each canvas pixel we find the source position it came from
//! and interpolate there, with the source pixel centers at `(i + 0.5)`.
//!
//! For a clockwise rotation by θ (y axis pointing down), the inverse
//! transform about the centers is:
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! Interpolation runs on premultiplied alpha and everything outside the
//! source silhouette is fully transparent, so the rotated edges blend into
//! the padding instead of picking up black fringes.

use serde::{Deserialize, Serialize};

use crate::decode::{RasterImage, CHANNELS};

/// Angles closer than this (in degrees) to a multiple of 90° are treated as
/// exact quarter turns.
pub const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for arbitrary-angle rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation - good for preview rendering.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation - good for export.
    Lanczos3,
}

/// A rotation in degrees, positive = clockwise on screen.
///
/// The raw value may lie outside `[0, 360)` (repeated ±90° steps produce
/// -90, 450, ...). Geometry always goes through [`RotationAngle::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotationAngle(pub f64);

impl RotationAngle {
    pub fn new(degrees: f64) -> Self {
        Self(degrees)
    }

    /// The raw value as the UI presents it.
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// The angle folded into `[0, 360)`. Non-finite input maps to 0.
    pub fn normalized(self) -> f64 {
        if !self.0.is_finite() {
            return 0.0;
        }
        let folded = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if folded >= 360.0 {
            0.0
        } else {
            folded
        }
    }

    pub fn radians(self) -> f64 {
        self.normalized().to_radians()
    }

    /// Number of clockwise quarter turns (0..=3) when the angle is a
    /// multiple of 90° within [`ANGLE_EPSILON`].
    pub fn quarter_turns(self) -> Option<u8> {
        let angle = self.normalized();
        let turns = (angle / 90.0).round();
        if (angle - turns * 90.0).abs() < ANGLE_EPSILON {
            Some((turns as u8) % 4)
        } else {
            None
        }
    }
}

impl From<f64> for RotationAngle {
    fn from(degrees: f64) -> Self {
        Self(degrees)
    }
}

/// Compute the exact bounding box of a `width` x `height` image rotated
/// about its center.
///
/// ```text
/// bound_w = |w*cos θ| + |h*sin θ|
/// bound_h = |w*sin θ| + |h*cos θ|
/// ```
///
/// The result stays in floating point; quarter turns return the exact
/// (possibly swapped) dimensions.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (f64, f64) {
    let (w, h) = (width as f64, height as f64);
    let angle = RotationAngle(angle_degrees);

    match angle.quarter_turns() {
        Some(0) | Some(2) => (w, h),
        Some(_) => (h, w),
        None => {
            let theta = angle.radians();
            let cos = theta.cos().abs();
            let sin = theta.sin().abs();
            (w * cos + h * sin, w * sin + h * cos)
        }
    }
}

/// Whole-pixel size of the working canvas for a rotation (minimum 1x1).
pub fn working_canvas_size(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let (bound_w, bound_h) = compute_rotated_bounds(width, height, angle_degrees);
    ((bound_w.round() as u32).max(1), (bound_h.round() as u32).max(1))
}

/// Render the full rotated working canvas.
///
/// The canvas is sized to the rotated bounding box with the image centered
/// in it; pixels outside the rotated silhouette are transparent.
pub fn render_rotated(
    image: &RasterImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> RasterImage {
    let view = RotatedView::new(image, RotationAngle(angle_degrees), filter);
    let (dst_w, dst_h) = view.canvas_size();

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * CHANNELS);
    for y in 0..dst_h as i64 {
        for x in 0..dst_w as i64 {
            output.extend_from_slice(&view.sample(x, y));
        }
    }

    RasterImage::new(dst_w, dst_h, output)
}

/// Lazily evaluated rotated canvas.
///
/// Sampling a single canvas pixel gives the same value [`render_rotated`]
/// stores at that position, so callers that only need a window of the
/// canvas never allocate the whole buffer.
pub(crate) struct RotatedView<'a> {
    image: &'a RasterImage,
    canvas_width: u32,
    canvas_height: u32,
    mapping: Mapping,
}

enum Mapping {
    QuarterTurns(u8),
    Arbitrary {
        cos: f64,
        sin: f64,
        filter: InterpolationFilter,
    },
}

impl<'a> RotatedView<'a> {
    pub(crate) fn new(
        image: &'a RasterImage,
        angle: RotationAngle,
        filter: InterpolationFilter,
    ) -> Self {
        let (canvas_width, canvas_height) =
            working_canvas_size(image.width, image.height, angle.normalized());
        let mapping = match angle.quarter_turns() {
            Some(turns) => Mapping::QuarterTurns(turns),
            None => {
                let theta = angle.radians();
                Mapping::Arbitrary {
                    cos: theta.cos(),
                    sin: theta.sin(),
                    filter,
                }
            }
        };
        Self {
            image,
            canvas_width,
            canvas_height,
            mapping,
        }
    }

    pub(crate) fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// RGBA value of canvas pixel (x, y); transparent outside the canvas.
    pub(crate) fn sample(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= self.canvas_width as i64 || y >= self.canvas_height as i64 {
            return [0; 4];
        }

        let (w, h) = (self.image.width as i64, self.image.height as i64);
        match self.mapping {
            Mapping::QuarterTurns(turns) => {
                let (src_x, src_y) = match turns {
                    0 => (x, y),
                    1 => (y, h - 1 - x),
                    2 => (w - 1 - x, h - 1 - y),
                    _ => (w - 1 - y, x),
                };
                fetch_straight(self.image, src_x, src_y)
            }
            Mapping::Arbitrary { cos, sin, filter } => {
                let dx = x as f64 + 0.5 - self.canvas_width as f64 / 2.0;
                let dy = y as f64 + 0.5 - self.canvas_height as f64 / 2.0;

                let src_x = dx * cos + dy * sin + w as f64 / 2.0 - 0.5;
                let src_y = -dx * sin + dy * cos + h as f64 / 2.0 - 0.5;

                let premultiplied = match filter {
                    InterpolationFilter::Bilinear => sample_bilinear(self.image, src_x, src_y),
                    InterpolationFilter::Lanczos3 => sample_lanczos3(self.image, src_x, src_y),
                };
                unpremultiply(premultiplied)
            }
        }
    }
}

/// Straight RGBA at integer coordinates, transparent outside the image.
#[inline]
fn fetch_straight(image: &RasterImage, x: i64, y: i64) -> [u8; 4] {
    if x < 0 || y < 0 || x >= image.width as i64 || y >= image.height as i64 {
        return [0; 4];
    }
    image.pixel(x as u32, y as u32)
}

/// Premultiplied RGBA at integer coordinates, zero outside the image.
#[inline]
fn fetch_premultiplied(image: &RasterImage, x: i64, y: i64) -> [f64; 4] {
    let [r, g, b, a] = fetch_straight(image, x, y);
    let alpha = a as f64 / 255.0;
    [r as f64 * alpha, g as f64 * alpha, b as f64 * alpha, a as f64]
}

/// Sample using bilinear interpolation over the 4 nearest pixel centers.
fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [f64; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = fetch_premultiplied(image, x0, y0);
    let p10 = fetch_premultiplied(image, x0 + 1, y0);
    let p01 = fetch_premultiplied(image, x0, y0 + 1);
    let p11 = fetch_premultiplied(image, x0 + 1, y0 + 1);

    let mut result = [0.0; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    result
}

/// Sample using Lanczos3 interpolation over a 6x6 neighborhood.
///
/// Neighbors outside the image count as transparent, so the kernel fades
/// the silhouette edge rather than clamping to it.
fn sample_lanczos3(image: &RasterImage, x: f64, y: f64) -> [f64; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = fetch_premultiplied(image, px, py);
            for i in 0..4 {
                sum[i] += pixel[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return [0.0; 4];
    }
    sum.map(|v| v / weight_sum)
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}

fn unpremultiply(p: [f64; 4]) -> [u8; 4] {
    let alpha = p[3].clamp(0.0, 255.0);
    if alpha < 0.5 {
        return [0; 4];
    }
    let scale = 255.0 / alpha;
    let channel = |v: f64| (v * scale).clamp(0.0, 255.0).round() as u8;
    [channel(p[0]), channel(p[1]), channel(p[2]), alpha.round() as u8]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Bounds contain the unrotated image's shorter side.
        #[test]
        fn prop_bounds_cover_image(
            width in 1u32..=500,
            height in 1u32..=500,
            angle in -720.0f64..=720.0,
        ) {
            let (bw, bh) = compute_rotated_bounds(width, height, angle);
            let min_side = width.min(height) as f64;
            prop_assert!(bw >= min_side - 1e-6);
            prop_assert!(bh >= min_side - 1e-6);
        }

        /// Property: Normalization lands in [0, 360) and preserves the bounds.
        #[test]
        fn prop_normalized_range(angle in -10_000.0f64..=10_000.0) {
            let normalized = RotationAngle(angle).normalized();
            prop_assert!((0.0..360.0).contains(&normalized));

            let (a, b) = compute_rotated_bounds(64, 32, angle);
            let (c, d) = compute_rotated_bounds(64, 32, normalized);
            prop_assert!((a - c).abs() < 1e-6 && (b - d).abs() < 1e-6);
        }
    }
}
