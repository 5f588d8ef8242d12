//! Analytic value noise and fBM (Deep Fried Edition)
//!
//! Procedural displacement and material breakup both sample from here,
//! so determinism matters: the same (point, seed) always yields the
//! same value on every thread of every run.
//!
//! # Deep Fried Optimizations
//! - **Forced Inlining**: All helpers (`fade`, `lerp`, `hash3d`) are
//!   forced inline to allow the compiler to flatten the octave loop.
//! - **Integer Hash Lattice**: No permutation tables, no global state.
//!
//! Author: Moroya Sakamoto

use glam::Vec3;

/// 3D value noise in roughly [-1, 1]
#[inline(always)]
pub fn value_noise_3d(x: f32, y: f32, z: f32, seed: u32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let zi = z.floor() as i32;

    let u = fade(x - x.floor());
    let v = fade(y - y.floor());
    let w = fade(z - z.floor());

    let aaa = lattice(xi, yi, zi, seed);
    let baa = lattice(xi + 1, yi, zi, seed);
    let aba = lattice(xi, yi + 1, zi, seed);
    let bba = lattice(xi + 1, yi + 1, zi, seed);
    let aab = lattice(xi, yi, zi + 1, seed);
    let bab = lattice(xi + 1, yi, zi + 1, seed);
    let abb = lattice(xi, yi + 1, zi + 1, seed);
    let bbb = lattice(xi + 1, yi + 1, zi + 1, seed);

    lerp(
        lerp(lerp(aaa, baa, u), lerp(aba, bba, u), v),
        lerp(lerp(aab, bab, u), lerp(abb, bbb, u), v),
        w,
    )
}

/// Value noise at a point, convenience wrapper
#[inline(always)]
pub fn value_noise_at(point: Vec3, frequency: f32, seed: u32) -> f32 {
    value_noise_3d(
        point.x * frequency,
        point.y * frequency,
        point.z * frequency,
        seed,
    )
}

/// Fractal Brownian Motion (fBM) noise, normalized to roughly [-1, 1]
#[inline(always)]
pub fn fbm_noise_3d(
    x: f32,
    y: f32,
    z: f32,
    seed: u32,
    octaves: u32,
    lacunarity: f32,
    persistence: f32,
) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for i in 0..octaves.max(1) {
        value += amplitude * value_noise_3d(x * frequency, y * frequency, z * frequency, seed + i);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    value / max_value
}

/// Perturb a distance value with fBM noise
///
/// The displacement amplitude also bounds how far the true surface can
/// move, so callers damp their step length by the same amount.
#[inline(always)]
pub fn modifier_noise(distance: f32, point: Vec3, amplitude: f32, frequency: f32, seed: u32) -> f32 {
    let n = fbm_noise_3d(
        point.x * frequency,
        point.y * frequency,
        point.z * frequency,
        seed,
        3,
        2.0,
        0.5,
    );
    distance + n * amplitude
}

/// Fold a seed vector into a lattice seed
///
/// The modeler stamps a random vector into each command; hashing its
/// bit patterns keeps two commands with different vectors decorrelated.
#[inline(always)]
pub fn seed_from_vector(v: Vec3) -> u32 {
    let mut h = v.x.to_bits();
    h ^= v.y.to_bits().rotate_left(13);
    h = h.wrapping_mul(0x85EBCA6B);
    h ^= v.z.to_bits().rotate_left(26);
    h = h.wrapping_mul(0xC2B2AE35);
    h ^ (h >> 16)
}

// Helper functions - all forced inline for maximum optimization

#[inline(always)]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[inline(always)]
fn hash3d(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed;
    h ^= x as u32;
    h = h.wrapping_mul(0x85EBCA6B);
    h ^= y as u32;
    h = h.wrapping_mul(0xC2B2AE35);
    h ^= z as u32;
    h = h.wrapping_mul(0x27D4EB2D);
    h ^= h >> 16;
    h
}

/// Lattice value in [-1, 1]
#[inline(always)]
fn lattice(x: i32, y: i32, z: i32, seed: u32) -> f32 {
    let h = hash3d(x, y, z, seed);
    (h & 0x00FF_FFFF) as f32 * (2.0 / 16_777_215.0) - 1.0
}
