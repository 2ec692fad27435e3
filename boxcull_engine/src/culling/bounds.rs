/// Per-instance bounding volumes.
///
/// World bounds are rebuilt every frame from each instance's world matrix
/// and the shared local box. They are derived data, never owned on their own.

use glam::{Mat4, Vec3};

/// Box described by two opposite corners.
///
/// After `transformed_corners` the corners are no longer guaranteed to be
/// ordered per axis; every consumer only needs the 8 corners, which are the
/// same set whatever the order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

/// Local-space box of the unit cube every instance draws.
pub const LOCAL_BOX: AABB = AABB {
    min: Vec3::splat(-0.5),
    max: Vec3::splat(0.5),
};

impl AABB {
    /// Transform only the two stored corners by `matrix`.
    ///
    /// Known looseness: this is not a tight world AABB once the matrix
    /// rotates. Only the diagonal corners move; the result is the box they
    /// span. The compute kernel does exactly the same thing, so CPU and
    /// GPU decisions stay identical. Do not replace with an 8-corner fit
    /// on one side only.
    pub fn transformed_corners(&self, matrix: &Mat4) -> AABB {
        AABB {
            min: matrix.transform_point3(self.min),
            max: matrix.transform_point3(self.max),
        }
    }

    /// The 8 corners spanned by `min` and `max`.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }
}

/// Rebuild world bounds for every instance, in instance order.
pub fn build_world_bounds(local: &AABB, world_matrices: &[Mat4], out: &mut Vec<AABB>) {
    out.clear();
    out.extend(world_matrices.iter().map(|world| local.transformed_corners(world)));
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
