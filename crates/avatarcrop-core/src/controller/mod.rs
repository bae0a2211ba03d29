//! Interactive crop state.
//!
//! The controller owns the continuous parameter vector (crop center, zoom,
//! rotation, flip, aspect) and recomputes the crop rectangle after every
//! event. Each event returns a [`CropSnapshot`]: an immutable, `Copy` bundle
//! that extraction consumes as a unit.
//!
//! ## Events
//!
//! - **Pointer**: `set_center`, `drag_by`, `begin_interaction`
//! - **Zoom**: `set_zoom`, `zoom_by` (clamped to the configured bounds)
//! - **Rotation**: `set_rotation`, `rotate_left`, `rotate_right`
//! - **Shape**: `set_aspect`, `resize_crop` (free aspect only)
//! - **Mirror**: `set_flip`, `toggle_flip_horizontal`, `toggle_flip_vertical`
//! - **Lifecycle**: `on_media_loaded`, `set_viewport`, `reset`

mod aspect;
mod snapshot;
mod state;

pub use aspect::AspectConstraint;
pub use snapshot::CropSnapshot;
pub use state::CropController;
