//! PNG encoding for the cropped result.
//!
//! PNG keeps the output lossless and preserves the transparent padding that
//! rotation can introduce. Encoding is deterministic: identical pixels give
//! identical bytes.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::{RasterImage, CHANNELS};

/// Default bound on either side of an encoded result.
pub const MAX_OUTPUT_DIMENSION: u32 = 8192;

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The raster exceeds the configured maximum dimension
    #[error("Output {width}x{height} exceeds the maximum dimension of {max} pixels")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// An encoded result ready for display or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// File name offered by the download action.
    pub const SUGGESTED_FILE_NAME: &'static str = "profile-image.png";

    pub fn mime_type(&self) -> &'static str {
        "image/png"
    }

    pub fn suggested_file_name(&self) -> &'static str {
        Self::SUGGESTED_FILE_NAME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode a raster to PNG bytes with the default dimension bound.
pub fn encode_png(image: &RasterImage) -> Result<EncodedImage, EncodeError> {
    encode_png_with_limit(image, MAX_OUTPUT_DIMENSION)
}

/// Encode a raster to PNG bytes.
///
/// # Errors
///
/// - `EncodeError::TooLarge` if either side exceeds `max_dimension`
/// - `EncodeError::InvalidDimensions` / `InvalidPixelData` for malformed rasters
/// - `EncodeError::EncodingFailed` if the PNG writer fails
pub fn encode_png_with_limit(
    image: &RasterImage,
    max_dimension: u32,
) -> Result<EncodedImage, EncodeError> {
    let (width, height) = (image.width, image.height);

    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    if width > max_dimension || height > max_dimension {
        return Err(EncodeError::TooLarge {
            width,
            height,
            max: max_dimension,
        });
    }

    let expected = width as usize * height as usize * CHANNELS;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&image.pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    log::debug!("encoded {}x{} PNG ({} bytes)", width, height, bytes.len());

    Ok(EncodedImage {
        width,
        height,
        bytes,
    })
}
