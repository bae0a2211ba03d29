//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG, GIF or WebP bytes to RGBA
//! - [`image_orientation`] - Read the EXIF orientation tag
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@avatarcrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{to_js_error, JsRasterImage};
use avatarcrop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from bytes.
///
/// EXIF orientation is applied, so the result is upright.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are empty or not a supported format
/// - The file is corrupted or truncated
/// - Either side exceeds the source dimension bound
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// EXIF orientation value (1-8) of the given bytes; 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}
