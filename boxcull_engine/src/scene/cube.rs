/// Unit cube geometry shared by every instance
///
/// 24 vertices (4 per face, so each face gets its own normal, tangent and
/// uv) and 36 16-bit indices. The cube spans [-0.5, 0.5] on every axis,
/// matching `culling::LOCAL_BOX`.

use bytemuck::{Pod, Zeroable};

/// Vertex layout of the cube vertex buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BoxVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
}

const fn vertex(position: [f32; 3], uv: [f32; 2], normal: [f32; 3], tangent: [f32; 3]) -> BoxVertex {
    BoxVertex { position, uv, normal, tangent }
}

pub const CUBE_VERTICES: [BoxVertex; 24] = [
    // Bottom
    vertex([-0.5, -0.5, 0.5], [0.0, 1.0], [0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([0.5, -0.5, 0.5], [1.0, 1.0], [0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([0.5, -0.5, -0.5], [1.0, 0.0], [0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([-0.5, -0.5, -0.5], [0.0, 0.0], [0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
    // Top
    vertex([-0.5, 0.5, -0.5], [1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([0.5, 0.5, 0.5], [0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    vertex([-0.5, 0.5, 0.5], [1.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    // +X
    vertex([0.5, -0.5, -0.5], [0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    vertex([0.5, -0.5, 0.5], [1.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    vertex([0.5, 0.5, 0.5], [1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    // -X
    vertex([-0.5, -0.5, 0.5], [0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    vertex([-0.5, -0.5, -0.5], [1.0, 1.0], [-1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    vertex([-0.5, 0.5, -0.5], [1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    vertex([-0.5, 0.5, 0.5], [0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    // +Z
    vertex([0.5, -0.5, 0.5], [1.0, 1.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]),
    vertex([-0.5, -0.5, 0.5], [0.0, 1.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]),
    vertex([-0.5, 0.5, 0.5], [0.0, 0.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]),
    vertex([0.5, 0.5, 0.5], [1.0, 0.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]),
    // -Z
    vertex([-0.5, -0.5, -0.5], [1.0, 1.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
    vertex([0.5, -0.5, -0.5], [0.0, 1.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
    vertex([0.5, 0.5, -0.5], [0.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
    vertex([-0.5, 0.5, -0.5], [1.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]),
];

/// Two triangles per face, clockwise front faces
pub const CUBE_INDICES: [u16; 36] = [
    0, 2, 1, 0, 3, 2,
    4, 6, 5, 4, 7, 6,
    8, 10, 9, 8, 11, 10,
    12, 14, 13, 12, 15, 14,
    16, 18, 17, 16, 19, 18,
    20, 22, 21, 20, 23, 22,
];
