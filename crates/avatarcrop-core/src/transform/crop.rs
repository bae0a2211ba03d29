//! Crop rectangles in displayed-image pixel space.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner of the displayed (flipped, unrotated) image
//! - Units are source pixels; values stay fractional until the final copy
//! - A rectangle is only meaningful together with the flip state and
//!   rotation that were active when it was captured

use serde::{Deserialize, Serialize};

/// A crop selection in the displayed image's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRectangle {
    /// Left edge in pixels
    pub x: f64,
    /// Top edge in pixels
    pub y: f64,
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl CropRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Output raster size: width and height rounded to whole pixels.
    pub fn pixel_size(&self) -> (i64, i64) {
        (self.width.round() as i64, self.height.round() as i64)
    }

    /// True when the rectangle cannot produce any output pixel.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        let (w, h) = self.pixel_size();
        !finite || self.width <= 0.0 || self.height <= 0.0 || w <= 0 || h <= 0
    }

    /// True when the rectangle lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        const TOLERANCE: f64 = 1e-6;
        self.x >= -TOLERANCE
            && self.y >= -TOLERANCE
            && self.x + self.width <= width + TOLERANCE
            && self.y + self.height <= height + TOLERANCE
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let rect = CropRectangle::centered(400.0, 300.0, 400.0, 400.0);
        assert_eq!(rect, CropRectangle::new(200.0, 100.0, 400.0, 400.0));
        assert_eq!(rect.center(), (400.0, 300.0));
    }

    #[test]
    fn test_pixel_size_rounds_to_nearest() {
        let rect = CropRectangle::new(0.0, 0.0, 99.5, 10.4);
        assert_eq!(rect.pixel_size(), (100, 10));
    }

    #[test]
    fn test_degenerate_rectangles() {
        assert!(CropRectangle::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(CropRectangle::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(CropRectangle::new(0.0, 0.0, 0.4, 10.0).is_degenerate());
        assert!(CropRectangle::new(f64::NAN, 0.0, 10.0, 10.0).is_degenerate());
        assert!(CropRectangle::new(0.0, 0.0, f64::INFINITY, 10.0).is_degenerate());
        assert!(!CropRectangle::new(0.0, 0.0, 0.5, 0.5).is_degenerate());
    }

    #[test]
    fn test_fits_within() {
        assert!(CropRectangle::new(0.0, 0.0, 100.0, 50.0).fits_within(100.0, 50.0));
        assert!(!CropRectangle::new(1.0, 0.0, 100.0, 50.0).fits_within(100.0, 50.0));
        assert!(!CropRectangle::new(-1.0, 0.0, 10.0, 10.0).fits_within(100.0, 50.0));
    }

    #[test]
    fn test_translated() {
        let rect = CropRectangle::new(1.0, 2.0, 3.0, 4.0).translated(-1.0, 0.5);
        assert_eq!(rect, CropRectangle::new(0.0, 2.5, 3.0, 4.0));
    }
}
