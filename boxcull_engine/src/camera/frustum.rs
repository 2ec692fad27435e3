/// Frustum - six clipping planes for visibility culling.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing unit normal
/// - D is the signed distance
/// - A point P is on the visible side of a plane if dot(plane, P_homogeneous) >= 0
///
/// Planes are rebuilt from the current view and projection matrices every
/// frame. They are never carried over from a previous frame.

use glam::{Mat4, Vec3, Vec4};
use crate::config::DepthConvention;
use crate::culling::AABB;

/// Frustum plane indices
pub const PLANE_NEAR: usize = 0;
pub const PLANE_FAR: usize = 1;
pub const PLANE_LEFT: usize = 2;
pub const PLANE_RIGHT: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_BOTTOM: usize = 5;

/// Normal length below which a plane is treated as degenerate.
///
/// Planes are divided by `max(length, MIN_NORMAL_LENGTH)`, so a degenerate
/// plane (e.g. the far plane of an infinite projection) keeps a huge
/// positive distance and never rejects anything.
pub const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// Six frustum planes for culling.
///
/// Order: near, far, left, right, top, bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes in world space, normalized
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract world-space planes from separate view and projection matrices.
    pub fn from_view_and_projection(
        view: &Mat4,
        projection: &Mat4,
        depth: DepthConvention,
    ) -> Self {
        Self::from_view_projection(&(*projection * *view), depth)
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Gribb & Hartmann: every plane is a sum or difference of the w row
    /// with one of the x, y or z rows. The z row is first remapped to a
    /// [-1, 1] depth range so the near/far combinations are the same for
    /// every `DepthConvention`. Row 2 of `projection * view` only depends
    /// on row 2 of the projection, so this is the same as adjusting the
    /// projection's depth terms before the multiply.
    pub fn from_view_projection(vp: &Mat4, depth: DepthConvention) -> Self {
        let row_x = vp.row(0);
        let row_y = vp.row(1);
        let row_w = vp.row(3);
        let row_z = depth_row(vp, depth);

        let planes = [
            normalize_plane(row_w + row_z), // near
            normalize_plane(row_w - row_z), // far
            normalize_plane(row_w + row_x), // left
            normalize_plane(row_w - row_x), // right
            normalize_plane(row_w - row_y), // top
            normalize_plane(row_w + row_y), // bottom
        ];

        Self { planes }
    }

    /// Signed distance of a point to one plane (positive = visible side).
    pub fn signed_distance(&self, plane: usize, point: Vec3) -> f32 {
        self.planes[plane].dot(point.extend(1.0))
    }

    /// True if the point is on the visible side of all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        (0..6).all(|plane| self.signed_distance(plane, point) >= 0.0)
    }

    /// Test if a box intersects this frustum.
    ///
    /// Conservative: the box is rejected only when all 8 corners are
    /// strictly outside one single plane. A box straddling every plane
    /// is kept.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        box_intersects_planes(&self.planes, aabb)
    }
}

/// Plane-set form of `Frustum::intersects_aabb`, shared with the compute
/// kernel which reads its planes from `SceneConstants`.
pub fn box_intersects_planes(planes: &[Vec4; 6], aabb: &AABB) -> bool {
    let corners = aabb.corners();
    planes.iter().all(|plane| {
        corners.iter().any(|corner| plane.dot(corner.extend(1.0)) >= 0.0)
    })
}

/// Z row of the view-projection matrix, remapped to a [-1, 1] depth range.
fn depth_row(vp: &Mat4, depth: DepthConvention) -> Vec4 {
    let row_z = vp.row(2);
    let row_w = vp.row(3);
    match depth {
        DepthConvention::NegativeOneToOne => row_z,
        // z' = 2z - w
        DepthConvention::ZeroToOne => row_z * 2.0 - row_w,
        // z' = w - 2z (near at z = w)
        DepthConvention::ReversedZeroToOne => row_w - row_z * 2.0,
    }
}

/// Divide a plane by the length of its normal, clamped away from zero.
pub fn normalize_plane(plane: Vec4) -> Vec4 {
    let normal_len = plane.truncate().length();
    plane / normal_len.max(MIN_NORMAL_LENGTH)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
