//! Tunable constants for the cropper.
//!
//! Every field has a default, so callers (including JS through
//! `serde-wasm-bindgen`) only pass what they want to change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::MAX_SOURCE_DIMENSION;
use crate::encode::MAX_OUTPUT_DIMENSION;
use crate::transform::InterpolationFilter;

/// Errors reported by [`CropperConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Zoom bounds are non-positive or inverted.
    #[error("Invalid zoom bounds: min ({min}) must be positive and not exceed max ({max})")]
    InvalidZoomBounds { min: f64, max: f64 },

    /// The small-image zoom falls outside the zoom bounds.
    #[error("Small image zoom {zoom} is outside the zoom bounds [{min}, {max}]")]
    SmallImageZoomOutOfBounds { zoom: f64, min: f64, max: f64 },

    /// A size or dimension limit is zero or negative.
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Configuration for the crop controller and session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperConfig {
    /// Sources with both sides below this are flagged as small (pixels)
    pub small_image_threshold: u32,
    /// Initial zoom for small sources
    pub small_image_zoom: f64,
    /// Lower zoom bound
    pub min_zoom: f64,
    /// Upper zoom bound
    pub max_zoom: f64,
    /// Degrees per rotate-left/right step
    pub rotation_step: f64,
    /// Width of the on-screen crop area (screen units)
    pub viewport_width: f64,
    /// Height of the on-screen crop area (screen units)
    pub viewport_height: f64,
    /// Filter for live previews
    pub preview_filter: InterpolationFilter,
    /// Filter for the committed result
    pub export_filter: InterpolationFilter,
    /// Largest side accepted for the encoded result
    pub max_output_dimension: u32,
    /// Largest side accepted for the decoded source
    pub max_source_dimension: u32,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            small_image_threshold: 300,
            small_image_zoom: 2.0,
            min_zoom: 1.0,
            max_zoom: 3.0,
            rotation_step: 90.0,
            viewport_width: 600.0,
            viewport_height: 400.0,
            preview_filter: InterpolationFilter::Bilinear,
            export_filter: InterpolationFilter::Lanczos3,
            max_output_dimension: MAX_OUTPUT_DIMENSION,
            max_source_dimension: MAX_SOURCE_DIMENSION,
        }
    }
}

impl CropperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the bounds are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("smallImageZoom", self.small_image_zoom),
            ("minZoom", self.min_zoom),
            ("maxZoom", self.max_zoom),
            ("rotationStep", self.rotation_step),
            ("viewportWidth", self.viewport_width),
            ("viewportHeight", self.viewport_height),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        if self.min_zoom <= 0.0 || self.max_zoom < self.min_zoom {
            return Err(ConfigError::InvalidZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.small_image_zoom) {
            return Err(ConfigError::SmallImageZoomOutOfBounds {
                zoom: self.small_image_zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        if self.viewport_width <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "viewportWidth",
            });
        }
        if self.viewport_height <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "viewportHeight",
            });
        }
        if self.max_output_dimension == 0 {
            return Err(ConfigError::NotPositive {
                field: "maxOutputDimension",
            });
        }
        if self.max_source_dimension == 0 {
            return Err(ConfigError::NotPositive {
                field: "maxSourceDimension",
            });
        }

        Ok(())
    }

    /// Clamp a zoom value into the configured bounds.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// True when both natural dimensions fall below the small-image threshold.
    pub fn is_small_image(&self, width: u32, height: u32) -> bool {
        width < self.small_image_threshold && height < self.small_image_threshold
    }
}
