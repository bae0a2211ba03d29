//! WASM bindings for the geometric operations.
//!
//! These are the stateless building blocks; [`crate::JsCropEditor`] drives
//! the same operations from an interactive session.

use crate::types::{filter_from_u8, to_js_error, JsRasterImage};
use avatarcrop_core::transform::{
    compute_rotated_bounds, extract_with_filter, flip, CropRectangle, FlipState, RotationAngle,
};
use wasm_bindgen::prelude::*;

/// Mirror an image horizontally and/or vertically.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const mirrored = flip_image(image, true, false);
/// ```
#[wasm_bindgen]
pub fn flip_image(
    image: &JsRasterImage,
    horizontal: bool,
    vertical: bool,
) -> Result<JsRasterImage, JsValue> {
    let src = image.to_raster().map_err(to_js_error)?;
    let result = flip(&src, FlipState::new(horizontal, vertical));
    Ok(JsRasterImage::from_raster(result))
}

/// Bounding box `[width, height]` of a `width` x `height` image rotated by
/// `angle_degrees` about its center. Not rounded.
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<f64> {
    let (bound_w, bound_h) = compute_rotated_bounds(width, height, angle_degrees);
    vec![bound_w, bound_h]
}

/// Extract a crop rectangle from an image rotated by `angle_degrees`.
///
/// The rectangle is given in the image's unrotated pixel space; the result
/// is `round(width) x round(height)` with transparent padding where the
/// rotated image does not reach.
///
/// # Arguments
///
/// * `filter` - 1 = Bilinear, 2 = Lanczos3
///
/// # Errors
///
/// Returns an error if the rectangle is degenerate or too large.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const out = extract_crop(image, 15.0, 100, 80, 400, 400, 2);
/// ```
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn extract_crop(
    image: &JsRasterImage,
    angle_degrees: f64,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    filter: u8,
) -> Result<JsRasterImage, JsValue> {
    let src = image.to_raster().map_err(to_js_error)?;
    let crop = CropRectangle::new(x, y, width, height);
    extract_with_filter(
        &src,
        RotationAngle::new(angle_degrees),
        Some(crop),
        filter_from_u8(filter),
    )
    .map(JsRasterImage::from_raster)
    .map_err(to_js_error)
}
