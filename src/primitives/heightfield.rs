//! Heightfield primitive SDF (Deep Fried Edition)
//!
//! A ground plane displaced by analytic fBM noise. Because the
//! displacement is evaluated directly at the query point the surface
//! stays infinite-resolution; no grid, no texture fetch.
//!
//! The displaced field is not a true SDF (the noise steepens local
//! gradients), so the result is damped by a Lipschitz factor to keep
//! sphere tracing from overshooting.
//!
//! Author: Moroya Sakamoto

use crate::noise::fbm_noise_3d;
use glam::Vec3;

/// Lipschitz damping applied to the displaced plane distance
const HEIGHTFIELD_DAMP: f32 = 0.6;

/// Signed distance to an fBM-displaced ground plane at y = 0
///
/// # Arguments
/// * `point` - Point to evaluate
/// * `frequency` - Base noise frequency across the XZ plane
/// * `octaves` - Number of fBM octaves
/// * `scale` - Peak displacement amplitude
/// * `seed` - Noise lattice seed
#[inline(always)]
pub fn sdf_heightfield(point: Vec3, frequency: f32, octaves: u32, scale: f32, seed: u32) -> f32 {
    let h = fbm_noise_3d(
        point.x * frequency,
        0.0,
        point.z * frequency,
        seed,
        octaves,
        2.0,
        0.5,
    ) * scale;
    (point.y - h) * HEIGHTFIELD_DAMP
}
