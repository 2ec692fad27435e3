use glam::{Mat4, Vec3, Vec4};
use rand::SeedableRng;
use rand::rngs::StdRng;
use crate::error::Error;
use super::*;

fn params(speed: f32) -> InstanceParams {
    InstanceParams {
        specular_power: 32.0,
        rotation_speed: speed,
        texture_index: 0,
        has_normal_map: true,
    }
}

// ============================================================================
// InstanceParams
// ============================================================================

#[test]
fn test_random_params_distribution() {
    let mut rng = StdRng::seed_from_u64(7);
    let generated = random_params(&mut rng, 500, 16.0, 3);

    assert_eq!(generated.len(), 500);
    for p in &generated {
        assert_eq!(p.specular_power, 16.0);
        assert!((-5.0..=4.0).contains(&p.rotation_speed));
        assert_eq!(p.rotation_speed.fract(), 0.0);
        assert!(p.texture_index < 3);
        assert_eq!(p.has_normal_map, p.texture_index == 0);
    }
    // Both ends of the speed range show up
    assert!(generated.iter().any(|p| p.rotation_speed == -5.0));
    assert!(generated.iter().any(|p| p.rotation_speed == 4.0));
}

#[test]
fn test_random_params_single_texture() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..20 {
        let p = InstanceParams::random(&mut rng, 8.0, 0);
        assert_eq!(p.texture_index, 0);
        assert!(p.has_normal_map);
    }
}

#[test]
fn test_params_packing() {
    let p = InstanceParams {
        specular_power: 64.0,
        rotation_speed: -3.0,
        texture_index: 2,
        has_normal_map: false,
    };
    assert_eq!(p.to_vec4(), Vec4::new(64.0, -3.0, 2.0, 0.0));
}

// ============================================================================
// Animation
// ============================================================================

#[test]
fn test_animation_at_time_zero_is_translation() {
    let position = Vec3::new(1.0, 2.0, 3.0);
    let world = animated_world(position, 4.0, 0.0);
    assert!(world.abs_diff_eq(Mat4::from_translation(position), 1e-6));
}

#[test]
fn test_zero_speed_never_moves() {
    let position = Vec3::new(-4.0, 0.5, 9.0);
    for t in [0.0, 1.0, 17.5] {
        assert!(animated_world(position, 0.0, t).abs_diff_eq(Mat4::from_translation(position), 1e-6));
    }
}

#[test]
fn test_animation_bobs_around_position() {
    let position = Vec3::new(0.0, 1.0, 0.0);
    let speed = 2.0;
    let t = 1.3;
    let world = animated_world(position, speed, t);

    let bob = (t * speed * 0.3).sin() * 0.25;
    let center = world.transform_point3(Vec3::ZERO);
    assert!((center - Vec3::new(0.0, 1.0 + bob, 0.0)).length() < 1e-5);
}

// ============================================================================
// InstanceSet
// ============================================================================

#[test]
fn test_instance_set_validation() {
    assert!(matches!(InstanceSet::new(Vec::new(), Vec::new()), Err(Error::InitializationFailed(_))));
    assert!(matches!(
        InstanceSet::new(vec![Vec3::ZERO; 2], vec![params(1.0)]),
        Err(Error::InitializationFailed(_))
    ));
}

#[test]
fn test_animate_fills_in_instance_order() {
    let positions = vec![Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -7.0)];
    let set = InstanceSet::new(positions.clone(), vec![params(1.0), params(-2.0)]).unwrap();
    assert_eq!(set.len(), 2);

    let mut worlds = vec![Mat4::IDENTITY; 5];
    let mut gpu = Vec::new();
    set.animate(0.75, &mut worlds, &mut gpu);

    assert_eq!(worlds.len(), 2);
    assert_eq!(gpu.len(), 2);
    for i in 0..2 {
        let expected = animated_world(positions[i], set.params()[i].rotation_speed, 0.75);
        assert_eq!(worlds[i], expected);
        assert_eq!(gpu[i].world, expected);
        assert_eq!(gpu[i].normal, expected);
        assert_eq!(gpu[i].params, set.params()[i].to_vec4());
    }
}
