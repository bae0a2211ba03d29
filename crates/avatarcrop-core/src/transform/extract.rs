//! Geometric crop extraction.
//!
//! Produces the final raster from a (flipped image, rotation, crop
//! rectangle) triple:
//!
//! 1. Normalize the rotation into `[0, 360)`.
//! 2. Compute the rotated bounding box of the flipped image.
//! 3. Treat the image as rendered rotated about its center onto a
//!    transparent working canvas of that size.
//! 4. Translate the crop rectangle by `((bound_w - w) / 2, (bound_h - h) / 2)`
//!    into canvas space. The rectangle itself is never rotated.
//! 5. Copy the translated region into a `round(width) x round(height)`
//!    output; anything outside the canvas is transparent.
//!
//! Offsets stay in floating point; rounding happens once, at the copy.
//! Only the canvas pixels covered by the crop are ever evaluated.
//!
//! The output is always the full rectangle. A round on-screen preview is a
//! presentation concern (see [`crate::preview`]) and never reaches here.

use thiserror::Error;

use super::crop::CropRectangle;
use super::rotation::{
    compute_rotated_bounds, working_canvas_size, InterpolationFilter, RotatedView, RotationAngle,
};
use crate::controller::CropSnapshot;
use crate::decode::{RasterImage, CHANNELS};

/// Upper bound on either side of an extracted raster.
pub const MAX_EXTRACT_DIMENSION: u32 = 16384;

/// Errors that can occur during crop extraction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    /// No crop rectangle yet; the interaction has not settled.
    #[error("No crop rectangle available: crop interaction has not settled")]
    MissingCrop,

    /// Width or height rounds to zero, is negative, or is not finite.
    #[error("Degenerate crop rectangle: {width}x{height}")]
    Degenerate { width: f64, height: f64 },

    /// The requested output would exceed the allocation bound.
    #[error("Crop {width}x{height} exceeds the maximum extraction dimension of {max} pixels")]
    Oversized { width: i64, height: i64, max: u32 },
}

/// Extract a crop with the default (bilinear) filter.
pub fn extract(
    image: &RasterImage,
    rotation: RotationAngle,
    crop: Option<CropRectangle>,
) -> Result<RasterImage, ExtractionError> {
    extract_with_filter(image, rotation, crop, InterpolationFilter::default())
}

/// Extract the crop described by one consistent controller snapshot.
///
/// `image` must be the raster displayed under `snapshot.flip`.
pub fn extract_snapshot(
    image: &RasterImage,
    snapshot: &CropSnapshot,
    filter: InterpolationFilter,
) -> Result<RasterImage, ExtractionError> {
    extract_with_filter(image, snapshot.rotation, snapshot.crop, filter)
}

/// Extract `crop` from `image` rotated by `rotation`.
///
/// # Returns
///
/// A raster of exactly `round(crop.width) x round(crop.height)` pixels.
///
/// # Errors
///
/// - `ExtractionError::MissingCrop` when `crop` is `None`
/// - `ExtractionError::Degenerate` when the rectangle has no pixels
/// - `ExtractionError::Oversized` when a side exceeds [`MAX_EXTRACT_DIMENSION`]
pub fn extract_with_filter(
    image: &RasterImage,
    rotation: RotationAngle,
    crop: Option<CropRectangle>,
    filter: InterpolationFilter,
) -> Result<RasterImage, ExtractionError> {
    let crop = crop.ok_or(ExtractionError::MissingCrop)?;
    if crop.is_degenerate() {
        return Err(ExtractionError::Degenerate {
            width: crop.width,
            height: crop.height,
        });
    }

    let (out_w, out_h) = crop.pixel_size();
    if out_w > MAX_EXTRACT_DIMENSION as i64 || out_h > MAX_EXTRACT_DIMENSION as i64 {
        return Err(ExtractionError::Oversized {
            width: out_w,
            height: out_h,
            max: MAX_EXTRACT_DIMENSION,
        });
    }

    let (out_w, out_h) = (out_w as u32, out_h as u32);
    let (offset_x, offset_y) = canvas_offset(image.width, image.height, rotation);
    let region = crop.translated(offset_x, offset_y);
    let (canvas_w, canvas_h) =
        working_canvas_size(image.width, image.height, rotation.normalized());

    let (Some(origin_x), Some(origin_y)) = (
        span_origin(region.x, out_w, canvas_w),
        span_origin(region.y, out_h, canvas_h),
    ) else {
        log::debug!(
            "crop at ({}, {}) misses the {}x{} canvas",
            region.x,
            region.y,
            canvas_w,
            canvas_h
        );
        return Ok(RasterImage::transparent(out_w, out_h));
    };

    log::debug!(
        "extracting {}x{} at ({}, {}) from {}x{} rotated {:.2}°",
        out_w,
        out_h,
        origin_x,
        origin_y,
        image.width,
        image.height,
        rotation.normalized()
    );

    if rotation.quarter_turns() == Some(0) {
        return Ok(copy_region(image, origin_x, origin_y, out_w, out_h));
    }

    let view = RotatedView::new(image, rotation, filter);
    let mut output = Vec::with_capacity(out_w as usize * out_h as usize * CHANNELS);
    for y in 0..out_h as i64 {
        for x in 0..out_w as i64 {
            output.extend_from_slice(&view.sample(origin_x + x, origin_y + y));
        }
    }

    Ok(RasterImage::new(out_w, out_h, output))
}

/// Translation from unrotated image space into working canvas space.
pub fn canvas_offset(width: u32, height: u32, rotation: RotationAngle) -> (f64, f64) {
    let (bound_w, bound_h) = compute_rotated_bounds(width, height, rotation.normalized());
    (
        (bound_w - width as f64) / 2.0,
        (bound_h - height as f64) / 2.0,
    )
}

/// Rounded start of a `len`-pixel span, or `None` when the span cannot
/// overlap `[0, extent)`.
fn span_origin(start: f64, len: u32, extent: u32) -> Option<i64> {
    let origin = start.round();
    if origin <= -(len as f64) || origin >= extent as f64 {
        return None;
    }
    Some(origin as i64)
}

/// Copy an unrotated region row by row, padding out-of-bounds with transparency.
fn copy_region(image: &RasterImage, left: i64, top: i64, width: u32, height: u32) -> RasterImage {
    let mut output = RasterImage::transparent(width, height);
    let out_row_len = output.row_len();

    // Horizontal overlap between the region and the image
    let src_start = left.max(0);
    let src_end = (left + width as i64).min(image.width as i64);
    if src_start >= src_end {
        return output;
    }
    let span = (src_end - src_start) as usize * CHANNELS;
    let dst_col = (src_start - left) as usize * CHANNELS;

    for y in 0..height as i64 {
        let src_y = top + y;
        if src_y < 0 || src_y >= image.height as i64 {
            continue;
        }
        let src_idx = src_y as usize * image.row_len() + src_start as usize * CHANNELS;
        let dst_idx = y as usize * out_row_len + dst_col;
        output.pixels[dst_idx..dst_idx + span]
            .copy_from_slice(&image.pixels[src_idx..src_idx + span]);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::flip::{flip, FlipState};
    use crate::transform::rotation::render_rotated;

    /// Opaque test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 7, 255]);
            }
        }
        RasterImage::new(width, height, pixels)
    }

    /// Reference copy of an in-bounds region.
    fn direct_copy(
        image: &RasterImage,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> RasterImage {
        let mut pixels = Vec::new();
        for y in top..top + height {
            for x in left..left + width {
                pixels.extend_from_slice(&image.pixel(x, y));
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_zero_rotation_is_direct_copy() {
        let img = test_image(40, 30);
        let crop = CropRectangle::new(5.0, 7.0, 20.0, 10.0);
        let result = extract(&img, RotationAngle(0.0), Some(crop)).unwrap();

        assert_eq!(result, direct_copy(&img, 5, 7, 20, 10));
        assert!(result.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_full_turn_is_direct_copy() {
        let img = test_image(10, 10);
        let crop = CropRectangle::new(2.0, 2.0, 4.0, 4.0);
        let result = extract(&img, RotationAngle(-360.0), Some(crop)).unwrap();
        assert_eq!(result, direct_copy(&img, 2, 2, 4, 4));
    }

    #[test]
    fn test_output_size_rounds_crop() {
        let img = test_image(50, 50);
        let crop = CropRectangle::new(1.3, 2.6, 10.5, 9.49);
        let result = extract(&img, RotationAngle(0.0), Some(crop)).unwrap();
        assert_eq!((result.width, result.height), (11, 9));
    }

    #[test]
    fn test_missing_crop_fails() {
        let img = test_image(10, 10);
        assert_eq!(
            extract(&img, RotationAngle(0.0), None),
            Err(ExtractionError::MissingCrop)
        );
    }

    #[test]
    fn test_degenerate_crop_fails() {
        let img = test_image(10, 10);
        for crop in [
            CropRectangle::new(0.0, 0.0, 0.0, 5.0),
            CropRectangle::new(0.0, 0.0, 5.0, -2.0),
            CropRectangle::new(0.0, 0.0, 0.2, 5.0),
        ] {
            let result = extract(&img, RotationAngle(0.0), Some(crop));
            assert!(
                matches!(result, Err(ExtractionError::Degenerate { .. })),
                "crop {:?} gave {:?}",
                crop,
                result
            );
        }
    }

    #[test]
    fn test_oversized_crop_fails() {
        let img = test_image(10, 10);
        let crop = CropRectangle::new(0.0, 0.0, 100_000.0, 10.0);
        let result = extract(&img, RotationAngle(0.0), Some(crop));
        assert!(matches!(result, Err(ExtractionError::Oversized { .. })));
    }

    #[test]
    fn test_out_of_bounds_region_is_transparent() {
        let img = test_image(10, 10);
        let crop = CropRectangle::new(-2.0, 8.0, 4.0, 4.0);
        let result = extract(&img, RotationAngle(0.0), Some(crop)).unwrap();

        // Only the top-right 2x2 quadrant overlaps the image
        assert_eq!(result.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(result.pixel(2, 0), [0, 8, 7, 255]);
        assert_eq!(result.pixel(3, 1), [1, 9, 7, 255]);
        assert_eq!(result.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_far_away_crop_is_transparent() {
        let img = test_image(4, 4);
        for (x, y, angle) in [
            (1e19, 0.0, 0.0),
            (-1e19, 0.0, 0.0),
            (0.0, 1e300, 90.0),
            (-5e18, -5e18, 37.0),
            (4.0, 0.0, 0.0),
            (-4.0, 0.0, 0.0),
        ] {
            let crop = CropRectangle::new(x, y, 4.0, 4.0);
            let result = extract(&img, RotationAngle(angle), Some(crop)).unwrap();
            assert_eq!(result, RasterImage::transparent(4, 4), "crop at ({x}, {y})");
        }

        // One column still overlaps
        let crop = CropRectangle::new(-3.0, 0.0, 4.0, 4.0);
        let result = extract(&img, RotationAngle(0.0), Some(crop)).unwrap();
        assert_eq!(result.pixel(3, 2), [0, 2, 7, 255]);
        assert_eq!(result.pixel(2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_flip_then_extract_left_third() {
        let source = test_image(90, 30);
        let flipped = flip(&source, FlipState::new(true, false));
        let crop = CropRectangle::new(0.0, 0.0, 30.0, 30.0);

        let result = extract(&flipped, RotationAngle(0.0), Some(crop)).unwrap();

        // Right third of the unflipped source, mirrored
        let right_third = direct_copy(&source, 60, 0, 30, 30);
        let expected = flip(&right_third, FlipState::new(true, false));
        assert_eq!(result, expected);
    }

    #[test]
    fn test_half_turn_matches_point_reflection() {
        let img = test_image(12, 8);
        let crop = CropRectangle::new(0.0, 0.0, 12.0, 8.0);
        let result = extract(&img, RotationAngle(180.0), Some(crop)).unwrap();
        assert_eq!(result, flip(&img, FlipState::new(true, true)));
    }

    #[test]
    fn test_quarter_turn_offsets_crop_into_canvas() {
        // 100x50 rotated 90°: canvas 50x100, offset (-25, 25)
        assert_eq!(canvas_offset(100, 50, RotationAngle(90.0)), (-25.0, 25.0));

        let img = test_image(100, 50);
        let crop = CropRectangle::new(25.0, 0.0, 50.0, 50.0);
        let result = extract(&img, RotationAngle(90.0), Some(crop)).unwrap();

        let canvas = render_rotated(&img, 90.0, InterpolationFilter::Bilinear);
        assert_eq!(result, direct_copy(&canvas, 0, 25, 50, 50));
    }

    #[test]
    fn test_arbitrary_angle_matches_full_canvas_copy() {
        let img = test_image(40, 24);
        let rotation = RotationAngle(37.0);
        let crop = CropRectangle::new(6.2, 3.7, 20.0, 14.0);

        let result = extract(&img, rotation, Some(crop)).unwrap();

        let canvas = render_rotated(&img, 37.0, InterpolationFilter::Bilinear);
        let (ox, oy) = canvas_offset(40, 24, rotation);
        let left = (crop.x + ox).round() as u32;
        let top = (crop.y + oy).round() as u32;
        assert_eq!(result, direct_copy(&canvas, left, top, 20, 14));
    }

    #[test]
    fn test_extreme_rotation_pads_with_transparency() {
        let img = test_image(100, 10);
        let crop = CropRectangle::new(0.0, 0.0, 100.0, 10.0);
        let result = extract(&img, RotationAngle(45.0), Some(crop)).unwrap();

        assert_eq!((result.width, result.height), (100, 10));
        // The thin strip rotated 45° leaves the crop corners uncovered
        assert_eq!(result.pixel(0, 0)[3], 0);
        assert_eq!(result.pixel(99, 0)[3], 0);
    }

    #[test]
    fn test_extract_snapshot_reads_snapshot() {
        let img = test_image(20, 20);
        let snapshot = CropSnapshot {
            crop: Some(CropRectangle::new(5.0, 5.0, 10.0, 10.0)),
            ..CropSnapshot::default()
        };
        let result = extract_snapshot(&img, &snapshot, InterpolationFilter::Lanczos3).unwrap();
        assert_eq!(result, direct_copy(&img, 5, 5, 10, 10));

        let empty = CropSnapshot::default();
        assert_eq!(
            extract_snapshot(&img, &empty, InterpolationFilter::Bilinear),
            Err(ExtractionError::MissingCrop)
        );
    }
}
