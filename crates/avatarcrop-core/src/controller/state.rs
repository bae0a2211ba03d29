//! The interactive crop state machine.

use super::aspect::fit_aspect;
use super::{AspectConstraint, CropSnapshot};
use crate::config::CropperConfig;
use crate::transform::{compute_rotated_bounds, CropRectangle, FlipState, RotationAngle};

/// Turns pointer, zoom, rotation, flip and aspect events into crop snapshots.
///
/// The crop rectangle lives in the displayed (flipped, unrotated) image's
/// pixel space. Its size is the largest rectangle of the active aspect that
/// fits the image, divided by the zoom; its center is clamped so the
/// rectangle never leaves the image. Parameter events never fail: invalid
/// input (NaN, non-positive sizes) is ignored and the current state kept.
#[derive(Debug, Clone)]
pub struct CropController {
    config: CropperConfig,
    natural: Option<(u32, u32)>,
    center: (f64, f64),
    zoom: f64,
    default_zoom: f64,
    rotation: RotationAngle,
    flip: FlipState,
    aspect: AspectConstraint,
    free_ratio: f64,
    viewport: (f64, f64),
    small_image: bool,
    show_drag_hint: bool,
    crop: Option<CropRectangle>,
    generation: u64,
}

impl CropController {
    /// Create an uninitialised controller; no crop exists until
    /// [`CropController::on_media_loaded`].
    pub fn new(config: CropperConfig) -> Self {
        let zoom = config.clamp_zoom(1.0);
        let viewport = (config.viewport_width, config.viewport_height);
        Self {
            config,
            natural: None,
            center: (0.0, 0.0),
            zoom,
            default_zoom: zoom,
            rotation: RotationAngle::default(),
            flip: FlipState::default(),
            aspect: AspectConstraint::Original,
            free_ratio: 1.0,
            viewport,
            small_image: false,
            show_drag_hint: false,
            crop: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.natural.is_some()
    }

    /// The current state without changing it.
    pub fn snapshot(&self) -> CropSnapshot {
        CropSnapshot {
            generation: self.generation,
            crop: self.crop,
            zoom: self.zoom,
            rotation: self.rotation,
            flip: self.flip,
            aspect: self.aspect,
            small_image: self.small_image,
            show_drag_hint: self.show_drag_hint,
        }
    }

    /// Report the natural size of the loaded source.
    ///
    /// The first call initialises the controller: aspect becomes `Original`,
    /// small sources start at the small-image zoom with the advisory set,
    /// larger ones at zoom 1 with the drag hint shown. Later calls only
    /// refresh the natural ratio. Zero sizes are ignored.
    pub fn on_media_loaded(&mut self, width: u32, height: u32) -> CropSnapshot {
        if width == 0 || height == 0 {
            return self.update();
        }

        if self.natural.is_some() {
            self.natural = Some((width, height));
            return self.update();
        }

        self.natural = Some((width, height));
        self.small_image = self.config.is_small_image(width, height);
        self.default_zoom = if self.small_image {
            self.config.clamp_zoom(self.config.small_image_zoom)
        } else {
            self.config.clamp_zoom(1.0)
        };
        self.zoom = self.default_zoom;
        self.show_drag_hint = !self.small_image;
        self.aspect = AspectConstraint::Original;
        self.free_ratio = width as f64 / height as f64;
        self.center = (width as f64 / 2.0, height as f64 / 2.0);

        log::debug!(
            "crop controller initialised for {}x{} (small: {}, zoom: {})",
            width,
            height,
            self.small_image,
            self.zoom
        );

        self.update()
    }

    /// Move the crop center to `(x, y)` in displayed-image pixels.
    pub fn set_center(&mut self, x: f64, y: f64) -> CropSnapshot {
        if x.is_finite() && y.is_finite() {
            self.center = (x, y);
        }
        self.update()
    }

    /// Drag the image by `(dx, dy)` viewport units.
    ///
    /// The image moves under a fixed crop area, so the crop center moves the
    /// opposite way. The delta is scaled by the fitted display scale times
    /// zoom and rotated back into the unrotated image's axes.
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> CropSnapshot {
        let Some(scale) = self.display_scale() else {
            return self.update();
        };
        if !(dx.is_finite() && dy.is_finite()) || scale <= 0.0 {
            return self.update();
        }

        let (sin, cos) = self.rotation.radians().sin_cos();
        let (sx, sy) = (dx / scale, dy / scale);
        let ix = sx * cos + sy * sin;
        let iy = -sx * sin + sy * cos;
        self.center = (self.center.0 - ix, self.center.1 - iy);
        self.update()
    }

    pub fn set_zoom(&mut self, zoom: f64) -> CropSnapshot {
        if !zoom.is_nan() {
            self.zoom = self.config.clamp_zoom(zoom);
        }
        self.update()
    }

    pub fn zoom_by(&mut self, delta: f64) -> CropSnapshot {
        self.set_zoom(self.zoom + delta)
    }

    /// Set the rotation in degrees; the raw value is kept for display.
    pub fn set_rotation(&mut self, degrees: f64) -> CropSnapshot {
        if degrees.is_finite() {
            self.rotation = RotationAngle::new(degrees);
        }
        self.update()
    }

    /// Rotate counter-clockwise by one rotation step.
    pub fn rotate_left(&mut self) -> CropSnapshot {
        self.set_rotation(self.rotation.degrees() - self.config.rotation_step)
    }

    /// Rotate clockwise by one rotation step.
    pub fn rotate_right(&mut self) -> CropSnapshot {
        self.set_rotation(self.rotation.degrees() + self.config.rotation_step)
    }

    pub fn set_aspect(&mut self, aspect: AspectConstraint) -> CropSnapshot {
        if aspect == AspectConstraint::Free && self.aspect != AspectConstraint::Free {
            self.free_ratio = self.natural_ratio();
        }
        self.aspect = aspect;
        self.update()
    }

    pub fn set_flip(&mut self, flip: FlipState) -> CropSnapshot {
        self.flip = flip;
        self.update()
    }

    pub fn toggle_flip_horizontal(&mut self) -> CropSnapshot {
        self.set_flip(self.flip.toggled_horizontal())
    }

    pub fn toggle_flip_vertical(&mut self) -> CropSnapshot {
        self.set_flip(self.flip.toggled_vertical())
    }

    /// Resize the on-screen crop area; only affects drag scaling.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> CropSnapshot {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
        }
        self.update()
    }

    /// Resize the crop rectangle to roughly `width` x `height` pixels.
    ///
    /// Only honoured under [`AspectConstraint::Free`]: the requested shape
    /// becomes the free ratio and the zoom is chosen so the rectangle matches
    /// the requested width (within the zoom bounds).
    pub fn resize_crop(&mut self, width: f64, height: f64) -> CropSnapshot {
        let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if self.aspect != AspectConstraint::Free || !valid {
            return self.update();
        }
        let Some((w, h)) = self.natural else {
            return self.update();
        };

        self.free_ratio = width / height;
        let (base_w, _) = fit_aspect(w as f64, h as f64, self.free_ratio);
        self.zoom = self.config.clamp_zoom(base_w / width);
        self.update()
    }

    /// Start of a user gesture; dismisses the drag hint.
    pub fn begin_interaction(&mut self) -> CropSnapshot {
        self.show_drag_hint = false;
        self.update()
    }

    /// Restore center, zoom, rotation and flip to their load-time defaults
    /// and aspect to `Original` in one step.
    pub fn reset(&mut self) -> CropSnapshot {
        if let Some((w, h)) = self.natural {
            self.center = (w as f64 / 2.0, h as f64 / 2.0);
        }
        self.zoom = self.default_zoom;
        self.rotation = RotationAngle::default();
        self.flip = FlipState::default();
        self.aspect = AspectConstraint::Original;
        self.free_ratio = self.natural_ratio();
        self.update()
    }

    /// Screen units per image pixel: the rotated image fitted into the
    /// viewport, times zoom.
    pub fn display_scale(&self) -> Option<f64> {
        let (w, h) = self.natural?;
        let (bound_w, bound_h) = compute_rotated_bounds(w, h, self.rotation.degrees());
        let fit = (self.viewport.0 / bound_w).min(self.viewport.1 / bound_h);
        Some(fit * self.zoom)
    }

    fn natural_ratio(&self) -> f64 {
        match self.natural {
            Some((w, h)) => w as f64 / h as f64,
            None => 1.0,
        }
    }

    fn update(&mut self) -> CropSnapshot {
        self.crop = None;
        if let Some((w, h)) = self.natural {
            self.crop = Some(self.fit_crop(w as f64, h as f64));
        }
        self.generation += 1;
        self.snapshot()
    }

    /// Size the crop for the current aspect and zoom, clamping the center.
    fn fit_crop(&mut self, width: f64, height: f64) -> CropRectangle {
        let ratio = self
            .aspect
            .ratio(width / height)
            .unwrap_or(self.free_ratio);
        let (base_w, base_h) = fit_aspect(width, height, ratio);
        let (crop_w, crop_h) = (base_w / self.zoom, base_h / self.zoom);

        let cx = clamp_axis(self.center.0, crop_w, width);
        let cy = clamp_axis(self.center.1, crop_h, height);
        self.center = (cx, cy);
        CropRectangle::centered(cx, cy, crop_w, crop_h)
    }
}

impl Default for CropController {
    fn default() -> Self {
        Self::new(CropperConfig::default())
    }
}

/// Clamp a center coordinate so a span of `size` stays inside `[0, extent]`.
fn clamp_axis(center: f64, size: f64, extent: f64) -> f64 {
    let half = size / 2.0;
    if size >= extent {
        extent / 2.0
    } else {
        center.clamp(half, extent - half)
    }
}
