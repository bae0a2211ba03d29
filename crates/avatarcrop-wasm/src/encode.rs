//! PNG encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png } from '@avatarcrop/wasm';
//!
//! const png = encode_png(cropped);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{to_js_error, JsRasterImage};
use avatarcrop_core::encode;
use wasm_bindgen::prelude::*;

/// Encode an RGBA image to PNG bytes.
///
/// Output is lossless and deterministic.
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
/// - Either side exceeds the output dimension bound
#[wasm_bindgen]
pub fn encode_png(image: &JsRasterImage) -> Result<Vec<u8>, JsValue> {
    let raster = image.to_raster().map_err(to_js_error)?;
    encode::encode_png(&raster)
        .map(|encoded| encoded.bytes)
        .map_err(to_js_error)
}
