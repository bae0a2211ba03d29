//! Image transformation operations: flip, rotation and crop extraction.
//!
//! # Transform Order
//!
//! 1. Flip (on every flip toggle, produces the displayed image)
//! 2. Rotation about the displayed image's center
//! 3. Crop extraction from the rotated working canvas
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in pixels of the displayed (flipped, unrotated) image
//! - Origin is top-left corner, y axis points down

mod crop;
mod extract;
mod flip;
mod rotation;

pub use crop::CropRectangle;
pub use extract::{
    canvas_offset, extract, extract_snapshot, extract_with_filter, ExtractionError,
    MAX_EXTRACT_DIMENSION,
};
pub use flip::{flip, flip_encoded, FlipState};
pub use rotation::{
    compute_rotated_bounds, render_rotated, working_canvas_size, InterpolationFilter,
    RotationAngle, ANGLE_EPSILON,
};
