//! AvatarCrop WASM - WebAssembly bindings for AvatarCrop
//!
//! This crate exposes the avatarcrop-core pipeline to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for raster data
//! - `decode` - Image decoding bindings
//! - `transform` - Flip, rotated bounds and crop extraction
//! - `encode` - PNG encoding
//! - `preview` - Round profile preview
//! - `editor` - The interactive `JsCropEditor`
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@avatarcrop/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const editor = new JsCropEditor(bytes);
//! editor.set_zoom(1.5);
//! const png = editor.commit();
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod editor;
mod encode;
mod logger;
mod preview;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, image_orientation};
pub use editor::JsCropEditor;
pub use encode::encode_png;
pub use preview::round_preview;
pub use transform::{extract_crop, flip_image, rotated_bounds};
pub use types::JsRasterImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
