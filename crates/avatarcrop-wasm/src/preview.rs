//! Round preview binding.

use crate::types::{to_js_error, JsRasterImage};
use avatarcrop_core::preview;
use wasm_bindgen::prelude::*;

/// Copy of `image` masked to its inscribed circle/ellipse, for display.
///
/// Never pass the result to `encode_png` for the profile upload; the saved
/// image is always the full rectangle.
#[wasm_bindgen]
pub fn round_preview(image: &JsRasterImage) -> Result<JsRasterImage, JsValue> {
    let raster = image.to_raster().map_err(to_js_error)?;
    Ok(JsRasterImage::from_raster(preview::round_preview(&raster)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_preview_clears_corners() {
        let img = JsRasterImage::new(32, 32, vec![255u8; 32 * 32 * 4]);
        let out = round_preview(&img).unwrap();
        let pixels = out.pixels();
        assert_eq!(pixels[3], 0);
        let center = (16 * 32 + 16) * 4;
        assert_eq!(pixels[center + 3], 255);
    }
}
