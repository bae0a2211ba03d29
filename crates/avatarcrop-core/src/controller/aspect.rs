//! Aspect-ratio constraints offered to the user.

use serde::{Deserialize, Serialize};

/// The shape the crop rectangle is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AspectConstraint {
    /// The natural ratio of the loaded source.
    #[default]
    Original,
    /// Any ratio; starts at the natural ratio and changes through resizing.
    Free,
    /// A fixed `width:height` ratio.
    Ratio { width: u32, height: u32 },
}

impl AspectConstraint {
    pub const SQUARE: Self = Self::Ratio {
        width: 1,
        height: 1,
    };
    pub const STANDARD: Self = Self::Ratio {
        width: 4,
        height: 3,
    };
    pub const WIDE: Self = Self::Ratio {
        width: 16,
        height: 9,
    };

    /// The choices shown in the aspect picker, in display order.
    pub const PRESETS: [Self; 4] = [Self::Original, Self::SQUARE, Self::STANDARD, Self::WIDE];

    /// Human-readable label ("Original", "1:1", ...).
    pub fn label(&self) -> String {
        match self {
            Self::Original => "Original".to_string(),
            Self::Free => "Free".to_string(),
            Self::Ratio { width, height } => format!("{}:{}", width, height),
        }
    }

    /// The locked width/height ratio, or `None` for [`AspectConstraint::Free`].
    ///
    /// A ratio with a zero term falls back to `natural`.
    pub fn ratio(&self, natural: f64) -> Option<f64> {
        match *self {
            Self::Original => Some(natural),
            Self::Free => None,
            Self::Ratio { width, height } if width > 0 && height > 0 => {
                Some(width as f64 / height as f64)
            }
            Self::Ratio { .. } => Some(natural),
        }
    }
}

/// Largest `ratio`-shaped rectangle that fits inside `width` x `height`.
pub(crate) fn fit_aspect(width: f64, height: f64, ratio: f64) -> (f64, f64) {
    if !(ratio.is_finite() && ratio > 0.0) {
        return (width, height);
    }
    if width / height > ratio {
        ((height * ratio).min(width), height)
    } else {
        (width, (width / ratio).min(height))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: The fitted rectangle has the requested ratio and fits.
        #[test]
        fn prop_fit_aspect_fits(
            width in 1.0f64..5000.0,
            height in 1.0f64..5000.0,
            ratio in 0.1f64..10.0,
        ) {
            let (w, h) = fit_aspect(width, height, ratio);
            prop_assert!(w <= width && h <= height);
            prop_assert!((w / h - ratio).abs() < 1e-6 * ratio.max(1.0));
            // One side always touches the bounds
            prop_assert!(w == width || h == height);
        }
    }
}
