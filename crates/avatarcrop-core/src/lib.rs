//! AvatarCrop Core - profile photo cropping library
//!
//! This crate provides the geometric pipeline behind the profile photo
//! cropper: decoding the source, mirroring it, tracking the interactive crop
//! state, extracting the rotated crop and encoding the result as PNG.
//!
//! ## Pipeline
//!
//! ```text
//! bytes -> decode -> flip -> (displayed raster + CropSnapshot) -> extract -> encode
//! ```
//!
//! [`CropSession`] wires the stages together; each stage is also usable on
//! its own.

pub mod config;
pub mod controller;
pub mod decode;
pub mod encode;
pub mod error;
pub mod preview;
pub mod session;
pub mod transform;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use config::{ConfigError, CropperConfig};
pub use controller::{AspectConstraint, CropController, CropSnapshot};
pub use decode::{decode_image, DecodeError, RasterImage};
pub use encode::{encode_png, EncodeError, EncodedImage};
pub use error::CropError;
pub use preview::round_preview;
pub use session::{CropSession, ExtractionJob};
pub use transform::{
    compute_rotated_bounds, extract, flip, CropRectangle, ExtractionError, FlipState,
    InterpolationFilter, RotationAngle,
};
#[cfg(not(target_arch = "wasm32"))]
pub use worker::{ExtractionResult, ExtractionWorker};
