//! WASM-compatible wrapper types for raster data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! AvatarCrop types, handling the conversion between Rust and JavaScript
//! data representations.

use std::fmt::Display;

use avatarcrop_core::decode::{DecodeError, RasterImage};
use avatarcrop_core::transform::InterpolationFilter;
use wasm_bindgen::prelude::*;

/// An RGBA raster wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`, ready for `ImageData`.
#[wasm_bindgen]
pub struct JsRasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsRasterImage {
    /// Create a new JsRasterImage from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsRasterImage {
        JsRasterImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer handles cleanup automatically.
    pub fn free(self) {}
}

impl JsRasterImage {
    pub(crate) fn from_raster(image: RasterImage) -> Self {
        Self {
            width: image.width,
            height: image.height,
            pixels: image.pixels,
        }
    }

    /// Convert to a core raster, validating the JS-supplied buffer.
    /// Clones the pixel data.
    pub(crate) fn to_raster(&self) -> Result<RasterImage, DecodeError> {
        RasterImage::try_new(self.width, self.height, self.pixels.clone())
    }
}

/// Convert a u8 filter value to the core InterpolationFilter.
///
/// Values:
/// - 1 = Bilinear (fast, used for previews)
/// - 2 = Lanczos3 (best quality, used for export)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> InterpolationFilter {
    match value {
        2 => InterpolationFilter::Lanczos3,
        _ => InterpolationFilter::Bilinear,
    }
}

/// Turn a core error into a JS `Error` carrying its message.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_image_creation() {
        let img = JsRasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_round_trip_through_core() {
        let raster = RasterImage::new(2, 1, vec![255, 128, 64, 32, 16, 8, 4, 2]);
        let js_img = JsRasterImage::from_raster(raster.clone());
        assert_eq!(js_img.pixels(), raster.pixels);
        assert_eq!(js_img.to_raster().unwrap(), raster);
    }

    #[test]
    fn test_to_raster_rejects_short_buffer() {
        let js_img = JsRasterImage::new(10, 10, vec![0u8; 10 * 10 * 3]);
        assert!(matches!(
            js_img.to_raster(),
            Err(DecodeError::InvalidBuffer { .. })
        ));
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(1), InterpolationFilter::Bilinear);
        assert_eq!(filter_from_u8(2), InterpolationFilter::Lanczos3);
        // Unknown values default to Bilinear
        assert_eq!(filter_from_u8(0), InterpolationFilter::Bilinear);
        assert_eq!(filter_from_u8(255), InterpolationFilter::Bilinear);
    }
}
