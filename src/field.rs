//! Field evaluation: the ordered CSG fold (Deep Fried Edition)
//!
//! The model is a left fold over the command list. The accumulator
//! carries a signed distance and the material that currently owns the
//! nearest surface; every command either reshapes the distance, blends
//! the material across its smoothing band, or both.
//!
//! The fold is a pure function of (commands, point), so batch variants
//! fan out over rayon with no shared mutable state.
//!
//! # Deep Fried Optimizations
//! - **Rotation Skip**: Identity rotations never touch the quaternion
//!   path.
//! - **Distance-Only Fold**: March loops call `field_distance`, which
//!   skips all material blending.
//!
//! Author: Moroya Sakamoto

use crate::material::{mix_materials, Material};
use crate::modeler::ModelerUniform;
use crate::noise::{modifier_noise, seed_from_vector};
use crate::operations::{blend_weight, repeat_clamped, smooth_max, smooth_min};
use crate::primitives::{sdf_heightfield, sdf_rounded_box3d, sdf_rounded_cylinder, sdf_sphere};
use crate::types::{Action, Role, FIELD_EMPTY, MIN_SIZE};
use glam::{EulerRot, Quat, Vec3};
use rayon::prelude::*;

/// Frequency of the per-command surface displacement noise
const DISPLACEMENT_FREQUENCY: f32 = 4.0;

/// Distance and owning material at a point
#[derive(Debug, Clone, Copy)]
pub struct FieldSample {
    /// Signed distance to the combined surface
    pub distance: f32,
    /// Material owning the nearest surface region
    pub material: Material,
}

/// Transform a world point into a command's local space
#[inline]
fn node_local_point(node: &ModelerUniform, point: Vec3) -> Vec3 {
    let mut q = point - node.position;
    if node.rotation != Vec3::ZERO {
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            node.rotation.x.to_radians(),
            node.rotation.y.to_radians(),
            node.rotation.z.to_radians(),
        );
        q = rot.conjugate() * q;
    }
    if node.rep_distance > 0.0 {
        q = repeat_clamped(
            q,
            node.rep_distance,
            node.rep_lower_limit,
            node.rep_upper_limit,
        );
    }
    q
}

/// Signed distance of a single command's shape at a world point
#[inline]
pub fn node_distance(node: &ModelerUniform, point: Vec3) -> f32 {
    let q = node_local_point(node, point);
    let mut d = match node.primitive_type {
        1 => sdf_rounded_box3d(q, node.size.max(Vec3::splat(MIN_SIZE)), node.rounding),
        2 => sdf_rounded_cylinder(
            q,
            node.radius.max(MIN_SIZE),
            node.size.y.max(MIN_SIZE),
            node.rounding,
        ),
        3 => sdf_heightfield(
            q,
            node.height_frequency,
            node.height_octaves as u32,
            node.height_scale,
            seed_from_vector(node.random_vector),
        ),
        _ => sdf_sphere(q, node.radius.max(MIN_SIZE)),
    };
    if node.noise > 0.0 {
        d = modifier_noise(
            d,
            q,
            node.noise,
            DISPLACEMENT_FREQUENCY,
            seed_from_vector(node.random_vector),
        );
    }
    d
}

/// Evaluate distance and material at a world point
///
/// Commands apply strictly in list order; reordering the list is a
/// different model.
pub fn field_sample(nodes: &[ModelerUniform], point: Vec3) -> FieldSample {
    let mut acc = FieldSample {
        distance: FIELD_EMPTY,
        material: Material::default(),
    };

    for node in nodes {
        let action = match Action::from_wire(node.action_type) {
            Some(Action::None) | None => continue,
            Some(a) => a,
        };
        let material_only = Role::from_wire(node.role_type) == Some(Role::MaterialOnly);
        let d = node_distance(node, point);

        match action {
            Action::None => {}
            Action::Clear => {
                // Material-only commands never touch geometry, Clear included
                if !material_only {
                    acc.distance = d;
                }
                acc.material = node.material;
            }
            Action::Add => {
                if material_only {
                    // Repaint inside the band without touching geometry
                    let s = node.smoothing.max(MIN_SIZE);
                    let w = (1.0 - (d / s).clamp(0.0, 1.0)) * node.material_only_mixer_value;
                    acc.material = mix_materials(
                        &acc.material,
                        &node.material,
                        w,
                        &node.mixer,
                        point,
                        acc.distance,
                    );
                } else {
                    let w = blend_weight(acc.distance, d, node.smoothing);
                    acc.material = mix_materials(
                        &acc.material,
                        &node.material,
                        w,
                        &node.mixer,
                        point,
                        acc.distance,
                    );
                    acc.distance = smooth_min(acc.distance, d, node.smoothing);
                }
            }
            Action::Subtract => {
                if material_only {
                    // Weight peaks where the carve would win, ramps out
                    // across the seam band, and vanishes far from the node
                    let w = blend_weight(-d, acc.distance, node.smoothing)
                        * node.material_only_mixer_value;
                    acc.material = mix_materials(
                        &acc.material,
                        &node.material,
                        w,
                        &node.mixer,
                        point,
                        acc.distance,
                    );
                } else {
                    // Carved region keeps the accumulated material
                    acc.distance = smooth_max(acc.distance, -d, node.smoothing);
                }
            }
        }
    }

    acc
}

/// Evaluate distance only, skipping all material blending
pub fn field_distance(nodes: &[ModelerUniform], point: Vec3) -> f32 {
    let mut acc = FIELD_EMPTY;
    for node in nodes {
        let action = match Action::from_wire(node.action_type) {
            Some(Action::None) | None => continue,
            Some(a) => a,
        };
        if Role::from_wire(node.role_type) == Some(Role::MaterialOnly) {
            continue;
        }
        let d = node_distance(node, point);
        acc = match action {
            Action::None => acc,
            Action::Clear => d,
            Action::Add => smooth_min(acc, d, node.smoothing),
            Action::Subtract => smooth_max(acc, -d, node.smoothing),
        };
    }
    acc
}

/// Surface normal by the tetrahedron technique
///
/// Four taps instead of six, offsets along tetrahedron vertices.
pub fn field_normal(nodes: &[ModelerUniform], point: Vec3, epsilon: f32) -> Vec3 {
    let k0 = Vec3::new(1.0, -1.0, -1.0);
    let k1 = Vec3::new(-1.0, -1.0, 1.0);
    let k2 = Vec3::new(-1.0, 1.0, -1.0);
    let k3 = Vec3::new(1.0, 1.0, 1.0);

    (k0 * field_distance(nodes, point + k0 * epsilon)
        + k1 * field_distance(nodes, point + k1 * epsilon)
        + k2 * field_distance(nodes, point + k2 * epsilon)
        + k3 * field_distance(nodes, point + k3 * epsilon))
    .normalize_or_zero()
}

/// Evaluate distances for a batch of points
pub fn field_distance_batch(nodes: &[ModelerUniform], points: &[Vec3]) -> Vec<f32> {
    points.iter().map(|&p| field_distance(nodes, p)).collect()
}

/// Evaluate distances for a batch of points across all cores
pub fn field_distance_batch_parallel(nodes: &[ModelerUniform], points: &[Vec3]) -> Vec<f32> {
    points
        .par_iter()
        .map(|&p| field_distance(nodes, p))
        .collect()
}
