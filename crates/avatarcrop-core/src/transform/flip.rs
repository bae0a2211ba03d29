//! Horizontal and vertical mirroring.
//!
//! Flipping never changes dimensions and is its own inverse:
//! `flip(&flip(&img, s), s) == img` for every [`FlipState`].

use serde::{Deserialize, Serialize};

use crate::decode::{decode_image, DecodeError, RasterImage, CHANNELS};

/// Which mirror axes are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct FlipState {
    /// Reverse the pixels of every row.
    pub horizontal: bool,
    /// Reverse the order of the rows.
    pub vertical: bool,
}

impl FlipState {
    pub fn new(horizontal: bool, vertical: bool) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// True when no mirroring applies.
    pub fn is_identity(self) -> bool {
        !self.horizontal && !self.vertical
    }

    pub fn toggled_horizontal(self) -> Self {
        Self {
            horizontal: !self.horizontal,
            ..self
        }
    }

    pub fn toggled_vertical(self) -> Self {
        Self {
            vertical: !self.vertical,
            ..self
        }
    }
}

/// Mirror an image according to `state`.
///
/// With both flags set the result is a 180° point reflection.
pub fn flip(image: &RasterImage, state: FlipState) -> RasterImage {
    if state.is_identity() {
        return image.clone();
    }

    let row_len = image.row_len();
    let mut output = Vec::with_capacity(image.pixels.len());

    let height = image.height as usize;

    for y in 0..height {
        let src_y = if state.vertical { height - 1 - y } else { y };
        let row = &image.pixels[src_y * row_len..(src_y + 1) * row_len];
        if state.horizontal {
            for px in row.chunks_exact(CHANNELS).rev() {
                output.extend_from_slice(px);
            }
        } else {
            output.extend_from_slice(row);
        }
    }

    RasterImage::new(image.width, image.height, output)
}

/// Decode source bytes and mirror the result.
///
/// # Errors
///
/// Propagates the [`DecodeError`] when the bytes cannot be rasterized; no
/// partial image is returned.
pub fn flip_encoded(bytes: &[u8], state: FlipState) -> Result<RasterImage, DecodeError> {
    let image = decode_image(bytes)?;
    Ok(flip(&image, state))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = RasterImage> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(w, h)| {
            let len = (w * h * 4) as usize;
            prop::collection::vec(any::<u8>(), len..=len)
                .prop_map(move |pixels| RasterImage::new(w, h, pixels))
        })
    }

    proptest! {
        /// Property: Flipping twice with the same state restores the input exactly.
        #[test]
        fn prop_flip_is_involutive(
            img in image_strategy(),
            horizontal in any::<bool>(),
            vertical in any::<bool>(),
        ) {
            let state = FlipState::new(horizontal, vertical);
            let twice = flip(&flip(&img, state), state);
            prop_assert_eq!(twice, img);
        }

        /// Property: Horizontal then vertical equals both at once.
        #[test]
        fn prop_flips_compose(img in image_strategy()) {
            let sequential = flip(
                &flip(&img, FlipState::new(true, false)),
                FlipState::new(false, true),
            );
            let combined = flip(&img, FlipState::new(true, true));
            prop_assert_eq!(sequential, combined);
        }
    }
}
