//! Integration tests: Material mixing
//!
//! Verifies channel independence, exact passthrough at the band
//! endpoints, the per-channel blend modes, and material flow through
//! the CSG fold.
//!
//! Author: Moroya Sakamoto

mod common;

use alice_modeler::prelude::*;
use common::*;

fn chalk() -> Material {
    Material::new(Vec3::new(0.9, 0.9, 0.85)).with_roughness(0.9)
}

fn steel() -> Material {
    Material::new(Vec3::new(0.6, 0.6, 0.65))
        .with_roughness(0.15)
        .with_metallic(1.0)
}

// ============================================================================
// Endpoint guarantees
// ============================================================================

#[test]
fn every_channel_passes_through_at_endpoints() {
    let a = chalk();
    let b = steel();
    let mixer = MaterialMixer::default();
    let at0 = mix_materials(&a, &b, 0.0, &mixer, Vec3::ZERO, 0.0);
    let at1 = mix_materials(&a, &b, 1.0, &mixer, Vec3::ZERO, 0.0);

    assert_eq!(at0.albedo, a.albedo);
    assert_eq!(at0.roughness, a.roughness);
    assert_eq!(at0.metallic, a.metallic);
    assert_eq!(at0.specular, a.specular);
    assert_eq!(at0.sheen, a.sheen);
    assert_eq!(at0.ior, a.ior);
    assert_eq!(at0.emission, a.emission);

    assert_eq!(at1.albedo, b.albedo);
    assert_eq!(at1.roughness, b.roughness);
    assert_eq!(at1.metallic, b.metallic);
    assert_eq!(at1.ior, b.ior);
}

#[test]
fn noise_mode_keeps_endpoints_exact() {
    let a = chalk();
    let b = steel();
    let mut mixer = MaterialMixer::default();
    mixer.albedo = ChannelMixer::new(BlendMode::ValueNoise, 1.0, false);
    mixer.roughness = ChannelMixer::new(BlendMode::ValueNoise, 1.0, true);
    for i in 0..16 {
        let p = Vec3::new(i as f32 * 0.31, 0.5, -i as f32 * 0.17);
        let at0 = mix_materials(&a, &b, 0.0, &mixer, p, 0.0);
        let at1 = mix_materials(&a, &b, 1.0, &mixer, p, 0.0);
        assert_eq!(at0.albedo, a.albedo);
        assert_eq!(at1.albedo, b.albedo);
        assert_eq!(at0.roughness, a.roughness);
        assert_eq!(at1.roughness, b.roughness);
    }
}

// ============================================================================
// Channel independence
// ============================================================================

#[test]
fn one_channel_mixer_does_not_leak() {
    let a = chalk();
    let b = steel();
    let plain = mix_materials(&a, &b, 0.35, &MaterialMixer::default(), Vec3::ZERO, -0.2);

    let mut mixer = MaterialMixer::default();
    mixer.metallic = ChannelMixer::new(BlendMode::Linear, 0.3, true);
    let tweaked = mix_materials(&a, &b, 0.35, &mixer, Vec3::ZERO, -0.2);

    // Only metallic (and the derived ax/ay cache) may move
    assert_eq!(plain.albedo, tweaked.albedo);
    assert_eq!(plain.roughness, tweaked.roughness);
    assert_eq!(plain.specular, tweaked.specular);
    assert_eq!(plain.emission, tweaked.emission);
    assert_eq!(plain.ior, tweaked.ior);
    assert!((plain.metallic - tweaked.metallic).abs() > 1e-6);
}

#[test]
fn scale_rescales_the_weight() {
    let a = chalk();
    let b = steel();
    let mut mixer = MaterialMixer::default();
    mixer.metallic = ChannelMixer::new(BlendMode::Linear, 0.5, false);
    let m = mix_materials(&a, &b, 1.0, &mixer, Vec3::ZERO, 0.0);
    // Half weight: metallic lands between the endpoints
    assert!((m.metallic - 0.5).abs() < 1e-6);
}

#[test]
fn depth_mode_fades_in_below_surface() {
    let a = chalk();
    let b = steel();
    let mut mixer = MaterialMixer::default();
    mixer.metallic = ChannelMixer::new(BlendMode::Depth, 1.0, false);
    let shallow = mix_materials(&a, &b, 1.0, &mixer, Vec3::ZERO, -0.1);
    let deep = mix_materials(&a, &b, 1.0, &mixer, Vec3::ZERO, -0.9);
    assert!(deep.metallic > shallow.metallic);
    // At the surface itself the depth mode contributes nothing
    let at_surface = mix_materials(&a, &b, 1.0, &mixer, Vec3::ZERO, 0.0);
    assert_eq!(at_surface.metallic, a.metallic);
}

// ============================================================================
// Derived anisotropy
// ============================================================================

#[test]
fn blended_material_has_fresh_anisotropy_cache() {
    let a = chalk();
    let b = steel().with_anisotropic(0.7);
    let m = mix_materials(&a, &b, 0.5, &MaterialMixer::default(), Vec3::ZERO, 0.0);
    let mut expected = m;
    expected.derive_anisotropy();
    assert_eq!(m.ax, expected.ax);
    assert_eq!(m.ay, expected.ay);
    assert!(m.ax >= 0.001 && m.ay >= 0.001);
}

// ============================================================================
// Material flow through the fold
// ============================================================================

#[test]
fn hard_union_assigns_nearest_material() {
    let nodes = two_material_model();
    let red_side = field_sample(&nodes, Vec3::new(-1.5, 0.0, 0.0));
    let blue_side = field_sample(&nodes, Vec3::new(1.5, 0.0, 0.0));
    assert_eq!(red_side.material.albedo, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(blue_side.material.albedo, Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn smooth_union_blends_in_the_band() {
    let mut red = ModelerNode::sphere(1.0).at(Vec3::new(-0.7, 0.0, 0.0));
    red.material.albedo = Vec3::new(1.0, 0.0, 0.0);
    let mut blue = ModelerNode::sphere(1.0).at(Vec3::new(0.7, 0.0, 0.0));
    blue.material.albedo = Vec3::new(0.0, 0.0, 1.0);
    blue.smoothing = 0.5;
    let nodes = upload(&[red, blue]).unwrap();

    // Equidistant point: both channels present
    let mid = field_sample(&nodes, Vec3::new(0.0, 0.9, 0.0));
    assert!(mid.material.albedo.x > 0.1);
    assert!(mid.material.albedo.z > 0.1);
}

#[test]
fn material_only_repaint_fades_with_distance() {
    let mut repaint = ModelerNode::sphere(0.3);
    repaint.role = Role::MaterialOnly;
    repaint.smoothing = 0.4;
    repaint.material.albedo = Vec3::new(0.0, 1.0, 0.0);
    let nodes = upload(&[ModelerNode::sphere(1.0), repaint]).unwrap();

    let inside = field_sample(&nodes, Vec3::new(0.1, 0.0, 0.0));
    let fringe = field_sample(&nodes, Vec3::new(0.55, 0.0, 0.0));
    let outside = field_sample(&nodes, Vec3::new(0.95, 0.0, 0.0));
    assert!(inside.material.albedo.y > fringe.material.albedo.y);
    assert!(fringe.material.albedo.y > outside.material.albedo.y - 1e-6);
    // Beyond the band the base material is untouched
    assert_eq!(outside.material.albedo, Material::default().albedo);
}

#[test]
fn repaint_strength_scales_the_blend() {
    let mut full = ModelerNode::sphere(0.5);
    full.role = Role::MaterialOnly;
    full.smoothing = 0.2;
    full.material.albedo = Vec3::new(0.0, 1.0, 0.0);
    let mut half = full.clone();
    half.material_only_mixer_value = 0.5;

    let full_nodes = upload(&[ModelerNode::sphere(1.0), full]).unwrap();
    let half_nodes = upload(&[ModelerNode::sphere(1.0), half]).unwrap();
    let p = Vec3::new(0.2, 0.0, 0.0);
    let strong = field_sample(&full_nodes, p).material.albedo.y;
    let weak = field_sample(&half_nodes, p).material.albedo.y;
    assert!(strong > weak);
    assert!(weak > Material::default().albedo.y);
}
