//! The immutable parameter bundle handed to extraction.

use serde::{Deserialize, Serialize};

use super::AspectConstraint;
use crate::transform::{CropRectangle, FlipState, RotationAngle};

/// One consistent view of the controller after an event.
///
/// Extraction reads `crop`, `rotation` and `flip` from the same snapshot, so
/// a crop rectangle is never paired with a flip or rotation from a different
/// moment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSnapshot {
    /// Strictly increasing per controller; used to detect stale results.
    pub generation: u64,
    /// `None` until the source has been loaded.
    pub crop: Option<CropRectangle>,
    pub zoom: f64,
    pub rotation: RotationAngle,
    pub flip: FlipState,
    pub aspect: AspectConstraint,
    /// Advisory: the source is below the small-image threshold.
    pub small_image: bool,
    /// Advisory: show the "drag to reposition" hint.
    pub show_drag_hint: bool,
}

impl Default for CropSnapshot {
    fn default() -> Self {
        Self {
            generation: 0,
            crop: None,
            zoom: 1.0,
            rotation: RotationAngle::default(),
            flip: FlipState::default(),
            aspect: AspectConstraint::default(),
            small_image: false,
            show_drag_hint: false,
        }
    }
}

impl CropSnapshot {
    /// True once a crop rectangle is available.
    pub fn is_ready(&self) -> bool {
        self.crop.is_some()
    }

    /// True when `other` was taken after this snapshot.
    pub fn is_superseded_by(&self, other: &CropSnapshot) -> bool {
        other.generation > self.generation
    }
}
