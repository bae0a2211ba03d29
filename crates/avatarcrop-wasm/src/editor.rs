//! Interactive crop editor for JavaScript.
//!
//! Wraps a core `CropSession`. Every event method returns the new snapshot
//! as a plain JS object:
//!
//! ```typescript
//! const editor = new JsCropEditor(bytes, { viewportWidth: 480 });
//! let snap = editor.set_zoom(1.5);
//! // { generation, crop: { x, y, width, height }, zoom, rotation,
//! //   flip: { horizontal, vertical }, aspect: { kind: 'original' },
//! //   smallImage, showDragHint }
//! const png = editor.commit();
//! ```

use crate::types::{to_js_error, JsRasterImage};
use avatarcrop_core::{
    AspectConstraint, CropController, CropError, CropSession, CropSnapshot, CropperConfig,
    EncodedImage, FlipState,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsCropEditor {
    session: CropSession,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Decode `bytes` and start a session.
    ///
    /// `config` is an optional object with camelCase `CropperConfig` fields;
    /// omitted fields keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], config: JsValue) -> Result<JsCropEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?
        };
        Self::open(bytes, config).map_err(to_js_error)
    }

    /// Current snapshot without changing anything.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Aspect choices for the picker, as `{ kind, width?, height? }` objects.
    pub fn aspect_presets() -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&AspectConstraint::PRESETS)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn small_image(&self) -> bool {
        self.session.snapshot().small_image
    }

    pub fn set_center(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.set_center(x, y))
    }

    /// Drag by `(dx, dy)` screen units.
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.drag_by(dx, dy))
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.set_zoom(zoom))
    }

    pub fn zoom_by(&mut self, delta: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.zoom_by(delta))
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.set_rotation(degrees))
    }

    pub fn rotate_left(&mut self) -> Result<JsValue, JsValue> {
        self.emit(CropController::rotate_left)
    }

    pub fn rotate_right(&mut self) -> Result<JsValue, JsValue> {
        self.emit(CropController::rotate_right)
    }

    /// Set the aspect from an object such as `{ kind: 'ratio', width: 1, height: 1 }`.
    pub fn set_aspect(&mut self, aspect: JsValue) -> Result<JsValue, JsValue> {
        let aspect: AspectConstraint = serde_wasm_bindgen::from_value(aspect)
            .map_err(|e| JsValue::from_str(&format!("Invalid aspect: {}", e)))?;
        self.emit(|c| c.set_aspect(aspect))
    }

    pub fn set_flip(&mut self, horizontal: bool, vertical: bool) -> Result<JsValue, JsValue> {
        self.emit(|c| c.set_flip(FlipState::new(horizontal, vertical)))
    }

    pub fn toggle_flip_horizontal(&mut self) -> Result<JsValue, JsValue> {
        self.emit(CropController::toggle_flip_horizontal)
    }

    pub fn toggle_flip_vertical(&mut self) -> Result<JsValue, JsValue> {
        self.emit(CropController::toggle_flip_vertical)
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.set_viewport(width, height))
    }

    /// Resize the crop; only honoured with the free aspect.
    pub fn resize_crop(&mut self, width: f64, height: f64) -> Result<JsValue, JsValue> {
        self.emit(|c| c.resize_crop(width, height))
    }

    pub fn begin_interaction(&mut self) -> Result<JsValue, JsValue> {
        self.emit(CropController::begin_interaction)
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.session.reset();
        to_js(&snapshot)
    }

    /// The flipped source as currently shown under the crop overlay.
    pub fn displayed_image(&self) -> JsRasterImage {
        JsRasterImage::from_raster(self.session.displayed().as_ref().clone())
    }

    /// Fast extraction of the current crop.
    pub fn preview(&self) -> Result<JsRasterImage, JsValue> {
        self.session
            .preview()
            .map(JsRasterImage::from_raster)
            .map_err(to_js_error)
    }

    /// Final extraction, encoded as PNG bytes.
    pub fn commit(&self) -> Result<Vec<u8>, JsValue> {
        self.session
            .commit()
            .map(|encoded| encoded.bytes)
            .map_err(to_js_error)
    }

    /// Download file name for the committed image.
    pub fn suggested_file_name() -> String {
        EncodedImage::SUGGESTED_FILE_NAME.to_string()
    }
}

impl JsCropEditor {
    pub(crate) fn open(bytes: &[u8], config: CropperConfig) -> Result<Self, CropError> {
        CropSession::open(bytes, config).map(|session| Self { session })
    }

    fn emit<F>(&mut self, event: F) -> Result<JsValue, JsValue>
    where
        F: FnOnce(&mut CropController) -> CropSnapshot,
    {
        let snapshot = self.session.update(event);
        to_js(&snapshot)
    }
}

fn to_js(snapshot: &CropSnapshot) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use avatarcrop_core::decode::RasterImage;
    use avatarcrop_core::encode::encode_png;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = (0..width * height * 4).map(|i| (i % 253) as u8).collect();
        encode_png(&RasterImage::new(width, height, pixels))
            .unwrap()
            .bytes
    }

    fn editor(width: u32, height: u32) -> JsCropEditor {
        JsCropEditor::open(&png_bytes(width, height), CropperConfig::default()).unwrap()
    }

    #[test]
    fn test_open_initialises_session() {
        let editor = editor(400, 300);
        assert!(!editor.small_image());
        assert!(editor.session.snapshot().crop.is_some());
    }

    #[test]
    fn test_small_image_flag() {
        assert!(editor(120, 80).small_image());
    }

    #[test]
    fn test_displayed_image_matches_source() {
        let editor = editor(30, 20);
        let displayed = editor.displayed_image();
        assert_eq!((displayed.width(), displayed.height()), (30, 20));
        assert_eq!(displayed.pixels(), editor.session.source().pixels);
    }

    #[test]
    fn test_preview_and_commit_sizes() {
        let editor = editor(400, 300);
        let preview = editor.preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (400, 300));
        let png = editor.commit().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_suggested_file_name_matches_commit() {
        let editor = editor(40, 40);
        let encoded = editor.session.commit().unwrap();
        assert_eq!(
            JsCropEditor::suggested_file_name(),
            encoded.suggested_file_name()
        );
        assert_eq!(JsCropEditor::suggested_file_name(), "profile-image.png");
    }
}
