//! Source image decoding with EXIF orientation handling.
//!
//! Browsers display photos EXIF-corrected, and the crop rectangle is picked
//! against what the user sees, so the orientation is baked into the raster
//! here, before any flip or rotation.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};

use super::{DecodeError, Orientation, RasterImage};

/// Default bound on either source dimension.
pub const MAX_SOURCE_DIMENSION: u32 = 16384;

/// Decode an image (PNG, JPEG, GIF or WebP) into an RGBA raster.
///
/// The container is sniffed from the bytes, the EXIF orientation is
/// applied and the result is converted to RGBA8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the container is not recognized,
/// `DecodeError::CorruptedFile` if decoding fails, and
/// `DecodeError::TooLarge` if either side exceeds [`MAX_SOURCE_DIMENSION`].
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    decode_image_with_limit(bytes, MAX_SOURCE_DIMENSION)
}

/// Decode an image, rejecting sources larger than `max_dimension` on either side.
///
/// The header is inspected first so oversized sources are rejected before
/// any pixel buffer is allocated.
pub fn decode_image_with_limit(
    bytes: &[u8],
    max_dimension: u32,
) -> Result<RasterImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let (width, height) = reader_for(bytes)?
        .into_dimensions()
        .map_err(map_image_error)?;
    if width > max_dimension || height > max_dimension {
        return Err(DecodeError::TooLarge {
            width,
            height,
            max: max_dimension,
        });
    }

    let orientation = extract_orientation(bytes);
    let img = reader_for(bytes)?.decode().map_err(map_image_error)?;
    let raster = RasterImage::from_rgba_image(apply_orientation(img, orientation).into_rgba8());
    if orientation.swaps_dimensions() {
        log::debug!(
            "EXIF orientation {:?} swapped {}x{} to {}x{}",
            orientation,
            width,
            height,
            raster.width,
            raster.height
        );
    }
    Ok(raster)
}

/// Extract EXIF orientation value from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}

fn reader_for(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
