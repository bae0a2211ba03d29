//! Source decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Decoding the uploaded source (PNG, JPEG, GIF, WebP) into an RGBA raster
//! - Applying the EXIF orientation so pixel coordinates match what the user sees
//! - Rejecting sources that exceed a dimension bound before allocating pixels
//!
//! All operations are synchronous; a corrupt source is fatal to the session
//! and surfaces as [`DecodeError`].

mod source;
mod types;

pub use source::{decode_image, decode_image_with_limit, get_orientation, MAX_SOURCE_DIMENSION};
pub use types::{DecodeError, Orientation, RasterImage, CHANNELS};
