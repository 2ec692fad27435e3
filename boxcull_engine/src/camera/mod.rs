//! Camera module - passive camera data and frustum extraction.
//!
//! The engine does NOT store or manage cameras. They are owned and driven
//! by the caller and handed to `InstancedBoxes::frame` every frame.

mod camera;
mod frustum;

pub use camera::Camera;
pub use frustum::{
    Frustum, box_intersects_planes, normalize_plane, MIN_NORMAL_LENGTH,
    PLANE_NEAR, PLANE_FAR, PLANE_LEFT, PLANE_RIGHT, PLANE_TOP, PLANE_BOTTOM,
};
