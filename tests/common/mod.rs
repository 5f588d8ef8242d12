//! Common test helpers for ALICE-Modeler integration tests
//!
//! Author: Moroya Sakamoto

use alice_modeler::prelude::*;

/// Route log output through the test harness
#[allow(dead_code)]
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Standard test models
// ============================================================================

/// Unit sphere at origin
pub fn sphere_model() -> Vec<ModelerUniform> {
    upload(&[ModelerNode::sphere(1.0)]).unwrap()
}

/// Sphere with a box carved out
pub fn carved_model() -> Vec<ModelerUniform> {
    upload(&[
        ModelerNode::sphere(1.0),
        ModelerNode::box3d(Vec3::splat(0.6)).with_action(Action::Subtract),
    ])
    .unwrap()
}

/// Two overlapping spheres with distinct materials, hard union
pub fn two_material_model() -> Vec<ModelerUniform> {
    let mut red = ModelerNode::sphere(1.0).at(Vec3::new(-0.7, 0.0, 0.0));
    red.material.albedo = Vec3::new(1.0, 0.0, 0.0);
    let mut blue = ModelerNode::sphere(1.0).at(Vec3::new(0.7, 0.0, 0.0));
    blue.material.albedo = Vec3::new(0.0, 0.0, 1.0);
    upload(&[red, blue]).unwrap()
}

// ============================================================================
// Standard scenes
// ============================================================================

/// Default camera scene with one distant sun
pub fn sun_scene() -> RenderScene {
    let mut scene = RenderScene::default();
    scene
        .push_light(LightDescriptor::Distant {
            direction: Vec3::new(0.2, -1.0, 0.3),
            emission: Vec3::splat(3.0),
        })
        .unwrap();
    scene
}

/// Pack the sun scene with a fixed frame seed
pub fn sun_uniform(sample_index: i32) -> RenderUniform {
    sun_scene()
        .to_uniform(Vec3::new(0.17, 0.53, 0.91), sample_index)
        .unwrap()
}

// ============================================================================
// Standard test points
// ============================================================================

/// 8 canonical test points (origin, axes, diagonal, surface, outside)
pub fn test_points() -> Vec<Vec3> {
    vec![
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.577, 0.577, 0.577),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, -1.5, 0.0),
        Vec3::new(0.3, 0.3, 0.3),
    ]
}
