//! Output encoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Encoding the extracted raster to lossless PNG
//! - Rejecting rasters over a dimension bound instead of truncating them
//!
//! # Examples
//!
//! ```ignore
//! use avatarcrop_core::encode::encode_png;
//!
//! let encoded = encode_png(&cropped)?;
//! println!("Encoded {} bytes", encoded.len());
//! ```

mod png;

pub use png::{encode_png, encode_png_with_limit, EncodeError, EncodedImage, MAX_OUTPUT_DIMENSION};
