/// GPU-visible records shared by the CPU path, the compute kernel and the
/// draw. Layouts are `#[repr(C)]` and must match the shader declarations.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, UVec4, Vec3, Vec4};

/// Triangles in one cube
pub const TRIANGLES_PER_BOX: u32 = 12;
/// Indices drawn per instance
pub const INDICES_PER_BOX: u32 = TRIANGLES_PER_BOX * 3;

// Culling kernel register slots
pub const CULL_SLOT_SCENE: u32 = 0;
pub const CULL_SLOT_INSTANCES: u32 = 1;
pub const CULL_SLOT_ARGS: u32 = 2;
pub const CULL_SLOT_VISIBLE: u32 = 3;

// Draw register slots
pub const DRAW_SLOT_INSTANCES: u32 = 0;
pub const DRAW_SLOT_SCENE: u32 = 1;
pub const DRAW_SLOT_VISIBLE: u32 = 2;

/// Per-instance data read by the kernel and the vertex/pixel stages
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceGpuData {
    /// World matrix
    pub world: Mat4,
    /// Normal matrix
    pub normal: Mat4,
    /// x - specular power, y - rotation speed, z - texture id, w - normal map presence
    pub params: Vec4,
}

/// Per-frame scene constants
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneConstants {
    /// projection * view
    pub view_projection: Mat4,
    /// Frustum planes (near, far, left, right, top, bottom)
    pub planes: [Vec4; 6],
    /// Camera position (w = 1)
    pub camera_position: Vec4,
    /// x - instance count, y - frustum test enabled, zw - unused
    pub cull_params: UVec4,
}

impl SceneConstants {
    pub fn new(
        view_projection: Mat4,
        planes: [Vec4; 6],
        camera_position: Vec3,
        instance_count: u32,
        frustum_test: bool,
    ) -> Self {
        Self {
            view_projection,
            planes,
            camera_position: camera_position.extend(1.0),
            cull_params: UVec4::new(instance_count, frustum_test as u32, 0, 0),
        }
    }

    /// Number of instances the kernel should test
    pub fn instance_count(&self) -> u32 {
        self.cull_params.x
    }

    /// False when every instance must pass
    pub fn frustum_test(&self) -> bool {
        self.cull_params.y != 0
    }
}

/// Arguments of an indexed, instanced indirect draw, in hardware order.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct IndirectArgs {
    pub index_count_per_instance: u32,
    /// Written by exactly one producer per frame (CPU or cull kernel)
    pub instance_count: u32,
    pub start_index_location: u32,
    pub base_vertex_location: i32,
    pub start_instance_location: u32,
}

impl IndirectArgs {
    /// Arguments for drawing `instance_count` cubes
    pub fn boxes(instance_count: u32) -> Self {
        Self {
            index_count_per_instance: INDICES_PER_BOX,
            instance_count,
            start_index_location: 0,
            base_vertex_location: 0,
            start_instance_location: 0,
        }
    }
}
