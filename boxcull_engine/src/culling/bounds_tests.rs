use glam::{Mat4, Quat, Vec3};
use super::*;

#[test]
fn test_translation_moves_both_corners() {
    let world = Mat4::from_translation(Vec3::new(3.0, -2.0, 7.0));
    let bounds = LOCAL_BOX.transformed_corners(&world);

    assert_eq!(bounds.min, Vec3::new(2.5, -2.5, 6.5));
    assert_eq!(bounds.max, Vec3::new(3.5, -1.5, 7.5));
}

#[test]
fn test_rotation_only_moves_diagonal() {
    // 90° about Y maps the (-0.5, -0.5, -0.5) corner to (-0.5, -0.5, 0.5)
    let world = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
    let bounds = LOCAL_BOX.transformed_corners(&world);

    assert!((bounds.min - Vec3::new(-0.5, -0.5, 0.5)).length() < 1e-5);
    assert!((bounds.max - Vec3::new(0.5, 0.5, -0.5)).length() < 1e-5);
}

#[test]
fn test_rotation_by_45_degrees_is_loose() {
    // A tight fit of a cube rotated 45° about Y spans ±0.707 in z.
    // Both diagonal corners land on z = 0, so the approximation is flat in z.
    let world = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_4));
    let bounds = LOCAL_BOX.transformed_corners(&world);

    let z_extent = (bounds.max.z - bounds.min.z).abs();
    assert!(z_extent < 1e-5, "two-corner bounds collapse in z, got {}", z_extent);
    let x_extent = (bounds.max.x - bounds.min.x).abs();
    assert!((x_extent - std::f32::consts::SQRT_2).abs() < 1e-5);
}

#[test]
fn test_corners_are_all_combinations() {
    let aabb = AABB { min: Vec3::new(0.0, 0.0, 0.0), max: Vec3::new(1.0, 2.0, 3.0) };
    let corners = aabb.corners();

    assert_eq!(corners.len(), 8);
    for x in [0.0, 1.0] {
        for y in [0.0, 2.0] {
            for z in [0.0, 3.0] {
                assert!(corners.contains(&Vec3::new(x, y, z)));
            }
        }
    }
}

#[test]
fn test_build_world_bounds_replaces_previous_content() {
    let mut out = vec![LOCAL_BOX; 5];
    let worlds = [
        Mat4::from_translation(Vec3::X),
        Mat4::from_translation(Vec3::Y),
    ];

    build_world_bounds(&LOCAL_BOX, &worlds, &mut out);

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].min, Vec3::new(0.5, -0.5, -0.5));
    assert_eq!(out[1].max, Vec3::new(0.5, 1.5, 0.5));
}
