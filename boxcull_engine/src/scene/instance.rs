/// Box instances: fixed positions, per-instance shading parameters and the
/// per-frame animation that turns them into world matrices.
///
/// The instance count is fixed when the set is built. Positions never
/// change; world matrices are derived from the elapsed time every frame.

use glam::{Mat4, Vec3, Vec4};
use rand::Rng;
use crate::culling::InstanceGpuData;
use crate::error::Result;

/// Shading and animation parameters of one box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceParams {
    /// Phong specular exponent
    pub specular_power: f32,
    /// Animation speed; also the phase of the bobbing motion
    pub rotation_speed: f32,
    /// Layer of the diffuse texture array
    pub texture_index: u32,
    /// Whether the normal map is applied
    pub has_normal_map: bool,
}

impl InstanceParams {
    /// Random parameters.
    ///
    /// Speed is a whole number in [-5, 4], the texture layer is uniform in
    /// [0, texture_count) and only layer 0 carries a normal map.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, specular_power: f32, texture_count: u32) -> Self {
        let texture_index = rng.gen_range(0..texture_count.max(1));
        Self {
            specular_power,
            rotation_speed: rng.gen_range(-5i32..5) as f32,
            texture_index,
            has_normal_map: texture_index == 0,
        }
    }

    /// Packed form read by the shaders
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(
            self.specular_power,
            self.rotation_speed,
            self.texture_index as f32,
            if self.has_normal_map { 1.0 } else { 0.0 },
        )
    }
}

/// `count` random parameter sets
pub fn random_params<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    specular_power: f32,
    texture_count: u32,
) -> Vec<InstanceParams> {
    (0..count)
        .map(|_| InstanceParams::random(rng, specular_power, texture_count))
        .collect()
}

/// World matrix of a box at `position` after `elapsed` seconds.
///
/// The box spins around Y, rocks around Z and bobs up and down, all
/// scaled by its speed.
pub fn animated_world(position: Vec3, speed: f32, elapsed: f32) -> Mat4 {
    let bob = (elapsed * speed * 0.3).sin() * 0.25;
    Mat4::from_translation(position)
        * Mat4::from_translation(Vec3::new(0.0, bob, 0.0))
        * Mat4::from_rotation_z(bob)
        * Mat4::from_rotation_y(elapsed * speed * 0.5)
}

/// The fixed set of boxes of one scene component
#[derive(Debug, Clone)]
pub struct InstanceSet {
    positions: Vec<Vec3>,
    params: Vec<InstanceParams>,
}

impl InstanceSet {
    pub fn new(positions: Vec<Vec3>, params: Vec<InstanceParams>) -> Result<Self> {
        if positions.is_empty() {
            crate::engine_bail!("boxcull::InstanceSet", InitializationFailed, "no instance positions");
        }
        if positions.len() != params.len() {
            crate::engine_bail!(
                "boxcull::InstanceSet",
                InitializationFailed,
                "{} positions but {} parameter sets",
                positions.len(),
                params.len()
            );
        }
        Ok(Self { positions, params })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn params(&self) -> &[InstanceParams] {
        &self.params
    }

    /// Fill `world_matrices` and `gpu_data` for time `elapsed`, in instance order.
    pub fn animate(&self, elapsed: f32, world_matrices: &mut Vec<Mat4>, gpu_data: &mut Vec<InstanceGpuData>) {
        world_matrices.clear();
        gpu_data.clear();

        for (position, params) in self.positions.iter().zip(&self.params) {
            let world = animated_world(*position, params.rotation_speed, elapsed);
            world_matrices.push(world);
            gpu_data.push(InstanceGpuData {
                world,
                normal: world,
                params: params.to_vec4(),
            });
        }
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
