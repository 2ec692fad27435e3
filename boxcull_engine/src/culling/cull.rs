/// Visibility decision, CPU list and GPU kernel.
///
/// Both paths run the same per-instance test: transform the two corners of
/// the local box, then reject only when all 8 corners are outside one plane.

use glam::Mat4;
use crate::camera::{Frustum, box_intersects_planes};
use crate::culling::{AABB, LOCAL_BOX, build_world_bounds};
use crate::culling::gpu_types::{IndirectArgs, InstanceGpuData, SceneConstants};

/// Ascending list of instance indices that survived culling.
///
/// Rebuilt from scratch every frame; never updated incrementally.
#[derive(Debug, Clone, Default)]
pub struct VisibilityList {
    indices: Vec<u32>,
    bounds: Vec<AABB>,
}

impl VisibilityList {
    pub fn with_capacity(instance_count: usize) -> Self {
        Self {
            indices: Vec::with_capacity(instance_count),
            bounds: Vec::with_capacity(instance_count),
        }
    }

    /// Rebuild the list from this frame's world matrices.
    pub fn rebuild(&mut self, frustum: &Frustum, world_matrices: &[Mat4], frustum_test: bool) {
        build_world_bounds(&LOCAL_BOX, world_matrices, &mut self.bounds);
        cull_instances(frustum, &self.bounds, frustum_test, &mut self.indices);
    }

    /// Surviving indices, ascending
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// World bounds computed by the last rebuild, in instance order
    pub fn bounds(&self) -> &[AABB] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// CPU frustum test over every instance's world bounds.
///
/// `visible` is cleared and refilled with kept indices in ascending order.
/// With `frustum_test == false` every instance is kept.
pub fn cull_instances(frustum: &Frustum, bounds: &[AABB], frustum_test: bool, visible: &mut Vec<u32>) {
    visible.clear();
    visible.extend(
        bounds
            .iter()
            .enumerate()
            .filter(|(_, aabb)| !frustum_test || frustum.intersects_aabb(aabb))
            .map(|(index, _)| index as u32),
    );
}

/// Reference implementation of one culling-kernel thread.
///
/// Mirrors the compute shader: threads past the instance count exit,
/// surviving instances take a slot with an atomic increment of the draw's
/// instance count and write their index there.
pub fn cull_kernel(
    thread_id: u32,
    scene: &SceneConstants,
    instances: &[InstanceGpuData],
    args: &mut IndirectArgs,
    visible: &mut [u32],
) {
    let index = thread_id as usize;
    if thread_id >= scene.instance_count() || index >= instances.len() {
        return;
    }

    let bounds = LOCAL_BOX.transformed_corners(&instances[index].world);
    if scene.frustum_test() && !box_intersects_planes(&scene.planes, &bounds) {
        return;
    }

    // InterlockedAdd(args.instance_count, 1, slot)
    let slot = args.instance_count;
    args.instance_count += 1;
    if let Some(dst) = visible.get_mut(slot as usize) {
        *dst = thread_id;
    }
}

#[cfg(test)]
#[path = "cull_tests.rs"]
mod tests;
