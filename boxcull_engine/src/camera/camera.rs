/// Camera - low-level passive data container.
///
/// The Camera computes nothing beyond the view-projection product. The
/// caller computes view and projection from its own high-level parameters
/// (position, rotation, FOV) and stores the results here.

use glam::{Mat4, Vec3};

/// Low-level camera. A passive data container.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    projection_matrix: Mat4,
    position: Vec3,
}

impl Camera {
    /// Create a new camera with the given matrices and world position.
    pub fn new(view: Mat4, projection: Mat4, position: Vec3) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: projection,
            position,
        }
    }

    /// Build a camera looking from `eye` toward `target` (Y up).
    pub fn look_at(eye: Vec3, target: Vec3, projection: Mat4) -> Self {
        Self::new(Mat4::look_at_rh(eye, target, Vec3::Y), projection, eye)
    }

    // ===== GETTERS =====

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    // ===== SETTERS - store, compute nothing =====

    /// Set the view matrix and the matching world position.
    pub fn set_view(&mut self, matrix: Mat4, position: Vec3) {
        self.view_matrix = matrix;
        self.position = position;
    }

    /// Set the projection matrix.
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
